pub mod npm;
