pub(crate) mod classes;
pub(crate) mod exams;
pub(crate) mod results;
pub(crate) mod schools;
pub(crate) mod students;
pub(crate) mod subjects;
pub(crate) mod users;
