mod test_utils;

mod analytics_test;
mod attendance_test;
mod middleware_test;
mod portal_test;
mod slots_test;
mod students_test;
mod teachers_test;
mod violations_test;
