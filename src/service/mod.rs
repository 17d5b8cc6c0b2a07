pub mod car_form;
pub mod media;
