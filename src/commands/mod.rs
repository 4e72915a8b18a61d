pub mod calibrate;
pub mod locate;
