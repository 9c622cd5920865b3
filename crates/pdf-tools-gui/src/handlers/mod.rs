pub mod arrange;
