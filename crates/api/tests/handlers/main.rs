#[path = "../test_utils.rs"]
mod test_utils;

mod appointment_test;
mod availability_test;
mod middleware_test;
mod routes_test;
mod staff_test;
