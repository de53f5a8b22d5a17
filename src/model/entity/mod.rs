mod account;
pub use account::{Account, AccountCreate, ProfileCreate};

mod course;
pub use course::{Course, CourseCreate, CourseFilter};

mod student;
pub use student::{Student, StudentFilter};

mod teacher;
pub use teacher::{Teacher, TeacherFilter};

mod mentor;
pub use mentor::{Mentor, MentorFilter};

mod lesson;
pub use lesson::{Lesson, LessonCreate, LessonFilter};

mod grade;
pub use grade::{Grade, GradeUpdate, GradeWithCourse};
