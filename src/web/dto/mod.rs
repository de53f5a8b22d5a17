pub mod account;
pub mod courses;
pub mod grades;
pub mod index;
pub mod lessons;
pub mod signup;
