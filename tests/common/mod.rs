use bannerflow::{repository::BannersRepository, store::StoreConfig};
use rand::Rng;
use tempfile::TempDir;

/// A file-backed banner collection living in its own temporary directory.
/// The directory, and with it the collection, is removed on drop.
pub struct BannerFixture {
    _dir: TempDir,
    pub config: StoreConfig,
}

impl BannerFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = StoreConfig::new(
            format!("sqlite://{}", dir.path().display()),
            "bannerflow_tests",
            "banners",
        );
        Self { _dir: dir, config }
    }

    pub fn repository(&self) -> BannersRepository {
        BannersRepository::connect(&self.config).expect("open banner store")
    }
}

pub fn random_id() -> i64 {
    rand::thread_rng().gen_range(1..2048)
}
