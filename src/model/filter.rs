//! Declarative list filters.
//!
//! Every listing accepts a set of optional query parameters. Each present
//! parameter turns into one `AND`-ed condition: either plain equality or a
//! case-insensitive substring match. Absent parameters are ignored, so an
//! empty filter selects the whole collection.

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Compiles itself into conditions on a [`WhereClause`].
pub trait FilterSet {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>);
}

/// Accumulates conditions on a query, emitting `WHERE` before the first one
/// and `AND` before the rest.
pub struct WhereClause<'q, 'args> {
    qb: &'q mut QueryBuilder<'args, Postgres>,
    empty: bool,
}

impl<'q, 'args> WhereClause<'q, 'args> {
    pub fn new(qb: &'q mut QueryBuilder<'args, Postgres>) -> Self {
        Self { qb, empty: true }
    }

    /// Starts a new condition and hands back the builder to write it.
    pub fn and(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.qb.push(if self.empty { " WHERE " } else { " AND " });
        self.empty = false;
        self.qb
    }

    pub fn exact<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.and().push(column).push(" = ").push_bind(value);
        }
        self
    }

    pub fn icontains(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.and()
                .push(column)
                .push(" ILIKE ")
                .push_bind(like_pattern(value));
        }
        self
    }
}

/// `%value%` with LIKE wildcards in `value` escaped.
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod test {
    use super::*;

    struct ByName {
        name: Option<String>,
        owner: Option<uuid::Uuid>,
    }

    impl FilterSet for ByName {
        fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
            clause
                .icontains("t.name", self.name.as_deref())
                .exact("t.owner_id", self.owner);
        }
    }

    fn compile(filter: &ByName) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things t");
        filter.apply(&mut WhereClause::new(&mut qb));
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_adds_nothing() {
        let sql = compile(&ByName { name: None, owner: None });
        assert_eq!(sql, "SELECT * FROM things t");
    }

    #[test]
    fn blank_text_is_ignored() {
        let sql = compile(&ByName { name: Some(String::new()), owner: None });
        assert_eq!(sql, "SELECT * FROM things t");
    }

    #[test]
    fn conditions_are_joined_with_and() {
        let sql = compile(&ByName {
            name: Some("alg".into()),
            owner: Some(uuid::Uuid::nil()),
        });
        assert_eq!(
            sql,
            "SELECT * FROM things t WHERE t.name ILIKE $1 AND t.owner_id = $2"
        );
    }

    #[test]
    fn preexisting_condition_keeps_numbering() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things t");
        let mut clause = WhereClause::new(&mut qb);
        clause.and().push("t.visible = ").push_bind(true);
        ByName { name: Some("x".into()), owner: None }.apply(&mut clause);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM things t WHERE t.visible = $1 AND t.name ILIKE $2"
        );
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("math"), "%math%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
