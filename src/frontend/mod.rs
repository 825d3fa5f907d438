use std::path::PathBuf;

use rocket::fs::NamedFile;
use rocket::{catch, delete, get, options, patch, post, put, Request, State};

/// Name of the entry document bootstrapping the single-page app
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Location of the prebuilt frontend bundle
///
/// The directory is only read per request; a missing bundle surfaces as a
/// filesystem error on the request that needs it, not at launch.
#[derive(Debug, Clone)]
pub struct FrontendDist {
    pub root: PathBuf,
}

/// Serve the entry document
#[get("/")]
pub async fn index(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Serve a file from the bundle
///
/// Paths that match nothing on disk get the entry document instead, so the
/// app's client-side router can resolve them. The segment guard normalizes
/// `..` away and refuses dotfile segments; refused paths take the fallback
/// too.
#[get("/<path..>")]
pub async fn asset(path: Option<PathBuf>, dist: &State<FrontendDist>) -> Option<NamedFile> {
    match path.map(|path| dist.root.join(path)) {
        Some(file) if file.is_file() => NamedFile::open(file).await.ok(),
        _ => entry_document(dist).await,
    }
}

/// Entry-document fallback for POST requests no route claimed
///
/// The variants below extend the rewrite to the remaining methods, so every
/// unmatched request gets the entry document with a plain 200; HEAD is
/// answered through the GET routes.
#[post("/<_..>")]
pub async fn post_fallback(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Entry-document fallback for PUT requests
#[put("/<_..>")]
pub async fn put_fallback(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Entry-document fallback for DELETE requests
#[delete("/<_..>")]
pub async fn delete_fallback(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Entry-document fallback for PATCH requests
#[patch("/<_..>")]
pub async fn patch_fallback(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Entry-document fallback for OPTIONS requests
#[options("/<_..>")]
pub async fn options_fallback(dist: &State<FrontendDist>) -> Option<NamedFile> {
    entry_document(dist).await
}

/// Last-resort 404 handler returning the entry document, covering whatever
/// the fallback routes above could not answer
#[catch(404)]
pub async fn spa_fallback(request: &Request<'_>) -> Option<NamedFile> {
    let dist = request.rocket().state::<FrontendDist>()?;
    entry_document(dist).await
}

#[doc(hidden)]
async fn entry_document(dist: &FrontendDist) -> Option<NamedFile> {
    NamedFile::open(dist.root.join(ENTRY_DOCUMENT)).await.ok()
}
