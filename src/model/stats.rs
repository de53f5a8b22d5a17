use crate::model::{ModelManager, error::DatabaseResult};

/// `(courses, teachers, students)` as persisted right now.
///
/// All three counts come from one statement, so they describe the same
/// snapshot of the database.
pub async fn calc_online_school_stats(mm: &ModelManager) -> DatabaseResult<(i64, i64, i64)> {
    let counts: (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM courses) AS num_courses,
            (SELECT COUNT(*) FROM teachers) AS num_teachers,
            (SELECT COUNT(*) FROM students) AS num_students
        "#,
    )
    .fetch_one(mm.executor())
    .await?;

    tracing::trace!(?counts, "school stats computed");
    Ok(counts)
}
