mod ingress;
mod service;

pub use service::MediaUploadService;
