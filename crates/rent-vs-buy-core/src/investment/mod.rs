pub mod compounding;
