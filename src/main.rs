mod error;
mod store;
mod website;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;

use std::path::PathBuf;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::fs::NamedFile;
use rocket::{Build, Rocket, State};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use store::Store;

#[launch]
fn rocket() -> _ {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    build(rocket::Config::figment())
}

fn build(figment: Figment) -> Rocket<Build> {
    let rocket = rocket::custom(figment)
        .attach(Store::fairing())
        .attach(assets_fairing())
        .mount("/", routes![static_file]);
    website::mount(rocket, "/")
}

fn assets_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Assets Config", |rocket| async move {
        let assets_dir: PathBuf = rocket
            .figment()
            .extract_inner("assets_dir")
            .unwrap_or_else(|_| PathBuf::from("."));
        if assets_dir.exists() {
            tracing::info!(assets_dir = %assets_dir.display(), "serving static assets");
            Ok(rocket.manage(AssetsDir(assets_dir)))
        } else {
            tracing::error!(
                assets_dir = %assets_dir.display(),
                "the assets directory does not exist"
            );
            Err(rocket)
        }
    })
}

#[derive(Debug)]
struct AssetsDir(PathBuf);

#[get("/static/<file..>")]
async fn static_file(file: PathBuf, assets_dir: &State<AssetsDir>) -> Option<NamedFile> {
    NamedFile::open(assets_dir.0.join(file)).await.ok()
}

#[cfg(test)]
mod tests {
    use rocket::error::ErrorKind;
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;

    fn client_with_assets(assets_dir: &str, database: &str) -> Result<Client, rocket::Error> {
        let figment = rocket::Config::figment()
            .merge(("databases.sqlite_database.url", database))
            .merge(("assets_dir", assets_dir))
            .merge(("log_level", "off"));
        Client::untracked(super::build(figment))
    }

    #[test]
    fn serves_files_from_assets_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.css"), "body { margin: 0; }").unwrap();
        let database = dir.path().join("assets.sqlite");
        let client = client_with_assets(
            &dir.path().display().to_string(),
            &database.display().to_string(),
        )
        .unwrap();

        let response = client.get("/static/main.css").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::CSS));
        assert_eq!(response.into_string().unwrap(), "body { margin: 0; }");

        let response = client.get("/static/missing.css").dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }

    #[test]
    fn missing_assets_dir_aborts_ignition() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("assets.sqlite");
        let missing = dir.path().join("does-not-exist");

        let result = client_with_assets(
            &missing.display().to_string(),
            &database.display().to_string(),
        );
        match result {
            Err(error) => assert!(matches!(error.kind(), ErrorKind::FailedFairings(_))),
            Ok(_) => panic!("ignition should fail without an assets directory"),
        }
    }
}
