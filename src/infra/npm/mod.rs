mod client;

pub use client::NpmClient;
