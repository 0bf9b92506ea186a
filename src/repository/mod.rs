mod banners;
mod document;
mod error;
pub mod traits;

pub use banners::BannersRepository;
pub use document::DocumentRepository;
pub use error::{RepoResult, RepositoryError};
pub use traits::Repository;
