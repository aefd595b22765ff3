pub mod buttons;
pub mod motor;
pub mod sensor;
pub mod ui;
