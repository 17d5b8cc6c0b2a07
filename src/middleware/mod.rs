pub mod car_submission;
pub mod flash;
