pub mod solace;
