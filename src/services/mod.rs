pub mod downloads_api;
