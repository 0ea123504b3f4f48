//! Integration test: full harvest over HTTP.
//!
//! A local server plays both the search backend and the image hosts. Runs the real
//! `SearchSource` and `CurlFetcher` through `harvest` and checks the output directory.

mod common;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use common::image_server::{self, ImageServer, Response};
use imgrab_core::config::{HttpConfig, SearchConfig};
use imgrab_core::fetch::CurlFetcher;
use imgrab_core::harvest::{harvest, HarvestOptions};
use imgrab_core::source::{SearchQuery, SearchSource, VecSource};
use imgrab_core::storage::rank_of;
use tempfile::tempdir;

fn http() -> HttpConfig {
    HttpConfig {
        user_agent: "imgrab-test/1.0".to_string(),
        referer: String::new(),
        connect_timeout_secs: 5,
        transfer_timeout_secs: Some(10),
    }
}

fn body(i: usize) -> Vec<u8> {
    format!("\u{89}PNG image number {}", i).repeat(100).into_bytes()
}

/// `/img/<i>.png` serves a PNG; odd `i` return 404 when `odd_missing` is set.
fn image_host(odd_missing: bool) -> ImageServer {
    image_server::start(move |req| {
        let Some(i) = req
            .path
            .strip_prefix("/img/")
            .and_then(|s| s.strip_suffix(".png"))
            .and_then(|s| s.parse::<usize>().ok())
        else {
            return Response::status(404);
        };
        if odd_missing && i % 2 == 1 {
            return Response::status(404);
        }
        Response::ok("image/png", body(i))
    })
}

fn out_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn options(count: u32, out: &Path, temp_root: &Path) -> HarvestOptions {
    HarvestOptions {
        workers: 3,
        queue_capacity: 5,
        temp_root: Some(temp_root.to_path_buf()),
        ..HarvestOptions::new(count, out)
    }
}

#[test]
fn ten_images_budget_five_byte_identical() {
    let host = image_host(false);
    let urls: Vec<String> = (0..10).map(|i| host.url(&format!("/img/{}.png", i))).collect();
    let by_name: HashMap<String, Vec<u8>> = (0..10)
        .map(|i| {
            let name = imgrab_core::fetch::temp_file_name(
                &urls[i],
                imgrab_core::fetch::ImageKind::Png,
            );
            (name, body(i))
        })
        .collect();
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();
    let mut source = VecSource::new(urls, 10);

    let report = harvest(
        &options(5, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap();

    let names = out_files(out.path());
    assert_eq!(names.len(), 5);
    let ranks: Vec<u32> = names.iter().filter_map(|n| rank_of(n)).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    for name in &names {
        let suffix = name.split_once('-').unwrap().1;
        let content = std::fs::read(out.path().join(name)).unwrap();
        assert_eq!(&content, by_name.get(suffix).expect("known image"));
    }
    assert_eq!(report.promoted, 5);
    assert!(!report.temp_dir.exists());
    assert_eq!(std::fs::read_dir(tmp_root.path()).unwrap().count(), 0);
}

#[test]
fn alternating_not_found_budget_three() {
    let host = image_host(true);
    let urls: Vec<String> = (0..12).map(|i| host.url(&format!("/img/{}.png", i))).collect();
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();
    let mut source = VecSource::new(urls, 4);

    let report = harvest(
        &options(3, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap();

    assert_eq!(out_files(out.path()).len(), 3);
    assert_eq!(report.downloaded, report.promoted + report.unslotted);
    // Only even-numbered images exist, so every saved file came from one.
    for path in &report.files {
        let content = std::fs::read(path).unwrap();
        let i = (0..12).step_by(2).find(|i| body(*i) == content);
        assert!(i.is_some(), "{} is not an even image", path.display());
    }
}

#[test]
fn html_candidate_produces_nothing() {
    let host = image_server::start(|_| Response::ok("text/html; charset=utf-8", "<p>hi</p>"));
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();
    let mut source = VecSource::new([host.url("/page")], 1);

    let report = harvest(
        &options(3, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap();

    assert!(out_files(out.path()).is_empty());
    assert_eq!(report.downloaded, 0);
    assert_eq!(report.failed, 1);
}

#[test]
fn repeated_slow_candidate_fills_consecutive_ranks() {
    let image: Vec<u8> = (0u8..=255).cycle().take(8 * 1024).collect();
    let served = image.clone();
    let host = image_server::start(move |_| {
        Response::ok("image/png", served.clone()).trickled(1024, Duration::from_millis(50))
    });
    let url = host.url("/popular.png");
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();
    let mut source = VecSource::new([url.clone(), url.clone(), url], 3);
    let opts = HarvestOptions {
        workers: 2,
        ..options(5, out.path(), tmp_root.path())
    };

    let report = harvest(&opts, &mut source, &CurlFetcher::new(http())).unwrap();

    let names = out_files(out.path());
    let ranks: Vec<u32> = names.iter().filter_map(|n| rank_of(n)).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    for name in &names {
        assert_eq!(std::fs::read(out.path().join(name)).unwrap(), image);
    }
    assert_eq!(report.downloaded, 3);
    assert_eq!(report.promoted, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(std::fs::read_dir(tmp_root.path()).unwrap().count(), 0);
}

/// Search backend: first page lists `per_page` images from `images`, later pages list the next
/// ones, and a page past the end has no media entries.
fn search_backend(images: Arc<ImageServer>, total: usize) -> ImageServer {
    image_server::start(move |req| {
        if req.path != "/images/search" {
            return Response::status(404);
        }
        let first: usize = req.param("first").and_then(|v| v.parse().ok()).unwrap_or(0);
        let mut page = String::from("<html><body>");
        for i in first..(first + 4).min(total) {
            let encoded = images
                .url(&format!("/img/{}.png", i))
                .replace(':', "%3A")
                .replace('/', "%2F");
            page.push_str(&format!(
                "<a class=\"iusc\" m=\"{{&quot;murl&quot;:&quot;{}&quot;}}\"></a>",
                encoded
            ));
        }
        page.push_str("</body></html>");
        Response::ok("text/html", page)
    })
}

#[test]
fn search_source_pages_until_budget_spent() {
    let images = Arc::new(image_host(false));
    let backend = search_backend(Arc::clone(&images), 40);
    let search = SearchConfig {
        endpoint: backend.url("/images/search"),
        form: "TEST".to_string(),
    };
    let query = SearchQuery::from_words(["red", "panda"], false);
    let mut source = SearchSource::new(http(), search, query).unwrap();
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();

    let report = harvest(
        &options(6, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap();

    assert_eq!(out_files(out.path()).len(), 6);
    let pages = backend.requests();
    assert!(pages.len() >= 2, "needs more than one page for 6 images");
    assert_eq!(pages[0].param("first"), Some("0"));
    assert_eq!(pages[0].param("count"), Some("6"));
    assert_eq!(pages[0].param("q"), Some("red+panda"));
    assert_eq!(pages[0].param("safesearch"), Some("off"));
    assert_eq!(pages[0].param("FORM"), Some("TEST"));
    assert_eq!(pages[1].param("first"), Some("4"));
    assert!(report.dispatched < 40);
}

#[test]
fn search_source_exhaustion_ends_run() {
    let images = Arc::new(image_host(false));
    let backend = search_backend(Arc::clone(&images), 3);
    let search = SearchConfig {
        endpoint: backend.url("/images/search"),
        form: "HDRSC2".to_string(),
    };
    let query = SearchQuery::from_words(["x"], true);
    let mut source = SearchSource::new(http(), search, query).unwrap();
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();

    let report = harvest(
        &options(50, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap();

    assert_eq!(report.promoted, 3);
    assert_eq!(out_files(out.path()).len(), 3);
    assert!(!report.temp_dir.exists());
}

#[test]
fn search_backend_error_is_fatal() {
    let backend = image_server::start(|_| Response::status(503));
    let search = SearchConfig {
        endpoint: backend.url("/images/search"),
        form: "HDRSC2".to_string(),
    };
    let query = SearchQuery::from_words(["x"], true);
    let mut source = SearchSource::new(http(), search, query).unwrap();
    let out = tempdir().unwrap();
    let tmp_root = tempdir().unwrap();

    let err = harvest(
        &options(5, out.path(), tmp_root.path()),
        &mut source,
        &CurlFetcher::new(http()),
    )
    .unwrap_err();

    assert!(format!("{:#}", err).contains("HTTP 503"));
    assert_eq!(std::fs::read_dir(tmp_root.path()).unwrap().count(), 0);
}
