pub mod annotate;
pub mod repository;

pub use annotate::GitAnnotationSource;
pub use repository::GitRepository;
