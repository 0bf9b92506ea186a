use anyhow::{Context, Result};

use crate::{
    cli::{BannerCmd, Command},
    models::Banner,
    repository::Repository,
};

impl Command {
    pub async fn run(&self, repository: &dyn Repository<Banner>) -> Result<()> {
        match self {
            Command::Banner { cmd } => cmd.run(repository).await,
        }
    }
}

impl BannerCmd {
    pub async fn run(&self, repository: &dyn Repository<Banner>) -> Result<()> {
        let output = self.execute(repository).await?;
        println!("{output}");
        Ok(())
    }

    /// Runs the command and returns what it would print.
    pub async fn execute(&self, repository: &dyn Repository<Banner>) -> Result<String> {
        let value = match self {
            BannerCmd::List => {
                let banners = repository.get_all().await.context("listing banners")?;
                serde_json::to_value(banners)?
            }
            BannerCmd::Get { id } => {
                let banner = repository
                    .get(*id)
                    .await
                    .with_context(|| format!("loading banner {id}"))?;
                serde_json::to_value(banner)?
            }
            BannerCmd::Create { id, html } => {
                let banner = repository
                    .create(Banner::new(*id, html.clone()))
                    .await
                    .with_context(|| format!("creating banner {id}"))?;
                log::info!("created banner {}", banner.id);
                serde_json::to_value(banner)?
            }
            BannerCmd::Update { id, html } => {
                repository
                    .update(Banner::new(*id, html.clone()))
                    .await
                    .with_context(|| format!("updating banner {id}"))?;
                serde_json::to_value(repository.get(*id).await?)?
            }
            BannerCmd::Delete { id } => {
                repository
                    .delete(*id)
                    .await
                    .with_context(|| format!("deleting banner {id}"))?;
                log::info!("deleted banner {id}");
                serde_json::Value::Null
            }
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repository::BannersRepository, store::StoreConfig};

    fn repo() -> BannersRepository {
        BannersRepository::connect(&StoreConfig::in_memory("banners")).unwrap()
    }

    #[tokio::test]
    async fn create_update_get_delete_via_commands() {
        let repo = repo();

        let out = BannerCmd::Create {
            id: 7,
            html: "<b>a</b>".into(),
        }
        .execute(&repo)
        .await
        .unwrap();
        let created: Banner = serde_json::from_str(&out).unwrap();
        assert_eq!(created.id, 7);

        let out = BannerCmd::Update {
            id: 7,
            html: "<i>b</i>".into(),
        }
        .execute(&repo)
        .await
        .unwrap();
        let updated: Banner = serde_json::from_str(&out).unwrap();
        assert_eq!(updated.html, "<i>b</i>");
        assert_eq!(updated.created, created.created);

        let out = BannerCmd::List.execute(&repo).await.unwrap();
        let all: Vec<Banner> = serde_json::from_str(&out).unwrap();
        assert_eq!(all.len(), 1);

        BannerCmd::Delete { id: 7 }.execute(&repo).await.unwrap();
        let out = BannerCmd::Get { id: 7 }.execute(&repo).await.unwrap();
        assert_eq!(out, "null");
    }

    #[tokio::test]
    async fn create_with_bad_html_carries_context() {
        let repo = repo();
        let err = BannerCmd::Create {
            id: 1,
            html: "<div>".into(),
        }
        .execute(&repo)
        .await
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("creating banner 1"));
        assert!(msg.contains("html"));
    }
}
