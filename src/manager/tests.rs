use super::*;
use crate::manifest::Manifest;
use crate::remote::testing::FakeFetcher;
use crate::utils::paths;
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

const REGISTRY: &str = "https://registry.test";

fn settings(root: &Path) -> Settings {
    Settings {
        registry_base: REGISTRY.to_string(),
        extensions_dir: root.to_path_buf(),
        host_version: "0.0.50".to_string(),
        package_manager: None,
    }
}

fn tarball_url(name: &str, version: &str) -> String {
    format!("{}/{}/-/{}-{}.tgz", REGISTRY, name, name, version)
}

fn registry_document(name: &str, version: &str, engines: &str) -> serde_json::Value {
    json!({
        "name": name,
        "dist-tags": { "latest": version },
        "versions": {
            (version): {
                "version": version,
                "engines": { "extman": engines },
                "dist": { "tarball": tarball_url(name, version) }
            }
        }
    })
}

fn add_registry_package(fetcher: &mut FakeFetcher, name: &str, version: &str, engines: &str) {
    fetcher.documents.insert(
        format!("{}/{}", REGISTRY, name),
        registry_document(name, version, engines),
    );
    fetcher.payloads.insert(
        tarball_url(name, version),
        vec![(
            "package.json".to_string(),
            json!({ "name": name, "version": version }).to_string(),
        )],
    );
}

fn collect(events: &RefCell<Vec<InstallEvent>>) -> impl Fn(&InstallEvent) + '_ {
    move |event: &InstallEvent| events.borrow_mut().push(event.clone())
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

#[test]
fn end_to_end_registry_install() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", ">=0.0.1");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(manager.install("sample@1.0.0", &report).expect("install"));

    let live = root.path().join("sample");
    assert!(live.is_dir());
    let descriptor = PackageDescriptor::load(&live).expect("descriptor");
    assert_eq!(descriptor.version.as_deref(), Some("1.0.0"));

    let manifest = Manifest::load(root.path()).expect("manifest");
    assert_eq!(
        manifest.dependencies.get("sample").map(String::as_str),
        Some(">=1.0.0")
    );
}

#[test]
fn incompatible_host_aborts_before_any_download() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path()); // host 0.0.50
    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", "^0.0.80");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    let err = manager.install("sample", &report).unwrap_err();
    assert!(matches!(err, ExtmanError::IncompatibleHost { .. }));
    assert_eq!(fetcher.downloads(), 0);
    assert!(!root.path().join("sample").exists());
}

#[test]
fn repository_install_records_the_raw_reference() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    fetcher.documents.insert(
        "https://raw.githubusercontent.com/x/y/master/package.json".to_string(),
        json!({ "name": "y-ext", "version": "0.2.0" }),
    );
    fetcher.payloads.insert(
        "https://github.com/x/y/archive/master.tar.gz".to_string(),
        vec![(
            "package.json".to_string(),
            json!({ "name": "y-ext", "version": "0.2.0" }).to_string(),
        )],
    );

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(
        manager
            .install("https://github.com/x/y", &report)
            .expect("install")
    );

    assert!(root.path().join("y-ext").is_dir());
    let manifest = Manifest::load(root.path()).expect("manifest");
    assert_eq!(
        manifest.dependencies.get("y-ext").map(String::as_str),
        Some("https://github.com/x/y")
    );
}

#[test]
fn existing_file_at_target_skips_that_install_only() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", ">=0.0.1");

    // Something that is not a directory already occupies the target path.
    fs::write(root.path().join("sample"), "not a directory").expect("seed");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(!manager.install("sample", &report).expect("install"));
    assert!(
        events
            .borrow()
            .iter()
            .any(|e| matches!(e, InstallEvent::SkippedExistingFile { name, .. } if name == "sample"))
    );
    // The collision is reported, never propagated, and nothing is recorded.
    let manifest = Manifest::load(root.path()).expect("manifest");
    assert!(manifest.dependencies.is_empty());
}

#[cfg(unix)]
#[test]
fn update_skips_symlinked_extensions() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let fetcher = FakeFetcher::default();

    let checkout = tempfile::tempdir().expect("checkout");
    std::os::unix::fs::symlink(checkout.path(), root.path().join("devext")).expect("symlink");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    // An empty fetcher would fail resolution, so returning false proves the
    // short-circuit fired before any network or filesystem work.
    assert!(!manager.check_update("devext", None, &report).expect("update"));
    assert!(
        events
            .borrow()
            .iter()
            .any(|e| matches!(e, InstallEvent::SkippedSymlink { name } if name == "devext"))
    );
    assert_eq!(fetcher.downloads(), 0);
}

#[test]
fn update_is_idempotent_when_versions_tie() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", ">=0.0.1");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(manager.install("sample", &report).expect("install"));
    assert_eq!(fetcher.downloads(), 1);

    assert!(!manager.check_update("sample", None, &report).expect("first check"));
    assert!(!manager.check_update("sample", None, &report).expect("second check"));

    // Short-circuited before staging: no further downloads, nothing staged.
    assert_eq!(fetcher.downloads(), 1);
    let staged: Vec<_> = fs::read_dir(paths::staging_area(root.path()))
        .expect("staging area")
        .collect();
    assert!(staged.is_empty());
    assert!(
        events
            .borrow()
            .iter()
            .any(|e| matches!(e, InstallEvent::UpToDate { name, .. } if name == "sample"))
    );
}

#[test]
fn update_installs_a_newer_version() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());

    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", ">=0.0.1");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);

    {
        let manager = ExtensionManager::new(&settings, &fetcher);
        assert!(manager.install("sample", &report).expect("install"));
    }

    // The registry moves on to 1.2.0.
    add_registry_package(&mut fetcher, "sample", "1.2.0", ">=0.0.1");
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(manager.check_update("sample", None, &report).expect("update"));

    let descriptor = PackageDescriptor::load(&root.path().join("sample")).expect("descriptor");
    assert_eq!(descriptor.version.as_deref(), Some("1.2.0"));
    let manifest = Manifest::load(root.path()).expect("manifest");
    assert_eq!(
        manifest.dependencies.get("sample").map(String::as_str),
        Some(">=1.2.0")
    );
}

#[test]
fn update_proceeds_when_installed_version_is_unknown() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    add_registry_package(&mut fetcher, "sample", "1.0.0", ">=0.0.1");

    // Live directory exists but its descriptor declares no version.
    let live = root.path().join("sample");
    fs::create_dir_all(&live).expect("mkdir");
    fs::write(live.join("package.json"), r#"{"name":"sample"}"#).expect("seed");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(manager.check_update("sample", None, &report).expect("update"));
    assert_eq!(fetcher.downloads(), 1);
}

#[test]
fn update_with_uri_override_pins_the_manifest_to_the_url() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());

    let mut fetcher = FakeFetcher::default();
    fetcher.documents.insert(
        "https://raw.githubusercontent.com/x/y/master/package.json".to_string(),
        json!({ "name": "y-ext", "version": "0.2.0" }),
    );
    fetcher.payloads.insert(
        "https://github.com/x/y/archive/master.tar.gz".to_string(),
        vec![(
            "package.json".to_string(),
            json!({ "name": "y-ext", "version": "0.2.0" }).to_string(),
        )],
    );

    let live = root.path().join("y-ext");
    fs::create_dir_all(&live).expect("mkdir");
    fs::write(
        live.join("package.json"),
        r#"{"name":"y-ext","version":"0.1.0"}"#,
    )
    .expect("seed");

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(
        manager
            .check_update("y-ext", Some("https://github.com/x/y"), &report)
            .expect("update")
    );
    let manifest = Manifest::load(root.path()).expect("manifest");
    assert_eq!(
        manifest.dependencies.get("y-ext").map(String::as_str),
        Some("https://github.com/x/y")
    );
}

#[test]
fn failed_download_leaves_live_tree_and_manifest_untouched() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let mut fetcher = FakeFetcher::default();
    // Document resolves, but no payload is registered for the tarball.
    fetcher.documents.insert(
        format!("{}/sample", REGISTRY),
        registry_document("sample", "1.0.0", ">=0.0.1"),
    );

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    let err = manager.install("sample", &report).unwrap_err();
    assert!(matches!(err, ExtmanError::Download(_)));
    assert!(!root.path().join("sample").exists());
    let manifest = Manifest::load(root.path()).expect("manifest");
    assert!(manifest.dependencies.is_empty());

    // The abandoned staging directory is reclaimed, not left to rot.
    let staged: Vec<_> = fs::read_dir(paths::staging_area(root.path()))
        .expect("staging area")
        .collect();
    assert!(staged.is_empty());
}

#[cfg(unix)]
#[test]
fn dependency_failure_is_reported_but_nonfatal() {
    let root = tempfile::tempdir().expect("tempdir");
    let bin = tempfile::tempdir().expect("bin");
    let script = write_script(
        bin.path(),
        "failing-pm",
        "#!/usr/bin/env bash\necho 'registry unreachable' >&2\nexit 1\n",
    );

    let mut settings = settings(root.path());
    settings.package_manager = Some(script);

    let mut fetcher = FakeFetcher::default();
    fetcher.documents.insert(
        format!("{}/sample", REGISTRY),
        registry_document("sample", "1.0.0", ">=0.0.1"),
    );
    fetcher.payloads.insert(
        tarball_url("sample", "1.0.0"),
        vec![(
            "package.json".to_string(),
            json!({
                "name": "sample",
                "version": "1.0.0",
                "dependencies": { "left-pad": "^1.3.0" }
            })
            .to_string(),
        )],
    );

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);

    assert!(manager.install("sample", &report).expect("install"));
    assert!(root.path().join("sample").is_dir());
    assert!(events.borrow().iter().any(|e| matches!(
        e,
        InstallEvent::DependencyInstallWarning { name, detail }
            if name == "sample" && detail.contains("registry unreachable")
    )));
}

#[cfg(unix)]
#[test]
fn package_manager_gets_restricted_args_for_registry_tarballs() {
    let root = tempfile::tempdir().expect("tempdir");
    let bin = tempfile::tempdir().expect("bin");
    let argfile = bin.path().join("args.txt");
    let script = write_script(
        bin.path(),
        "recording-pm",
        &format!("#!/usr/bin/env bash\necho \"$@\" > '{}'\nexit 0\n", argfile.display()),
    );

    let mut settings = settings(root.path());
    settings.package_manager = Some(script);

    let mut fetcher = FakeFetcher::default();
    fetcher.documents.insert(
        format!("{}/sample", REGISTRY),
        registry_document("sample", "1.0.0", ">=0.0.1"),
    );
    fetcher.payloads.insert(
        tarball_url("sample", "1.0.0"),
        vec![(
            "package.json".to_string(),
            json!({
                "name": "sample",
                "version": "1.0.0",
                "dependencies": { "left-pad": "^1.3.0" }
            })
            .to_string(),
        )],
    );

    let events = RefCell::new(Vec::new());
    let report = collect(&events);
    let manager = ExtensionManager::new(&settings, &fetcher);
    assert!(manager.install("sample", &report).expect("install"));

    let recorded = fs::read_to_string(&argfile).expect("recorded args");
    assert_eq!(
        recorded.trim(),
        "install --ignore-scripts --no-lockfile --production"
    );
}

#[test]
fn installed_extensions_skips_hidden_entries_and_sorts() {
    let root = tempfile::tempdir().expect("tempdir");
    let settings = settings(root.path());
    let fetcher = FakeFetcher::default();

    for name in ["zeta", "alpha"] {
        let dir = root.path().join(name);
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name":"{}","version":"0.1.0"}}"#, name),
        )
        .expect("seed");
    }
    fs::create_dir_all(paths::staging_area(root.path())).expect("staging");
    fs::write(root.path().join("package.json"), "{}").expect("manifest");

    let manager = ExtensionManager::new(&settings, &fetcher);
    let extensions = manager.installed_extensions().expect("list");

    let names: Vec<_> = extensions.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert!(extensions.iter().all(|e| !e.development));
    assert_eq!(extensions[0].version.as_deref(), Some("0.1.0"));
}

#[test]
fn update_needed_is_a_not_worse_than_comparison() {
    assert!(!update_needed("1.2.0", Some("1.2.0")));
    assert!(!update_needed("1.3.0", Some("1.2.0")));
    assert!(update_needed("1.2.0", Some("1.3.0")));
    // Unparsable on either side: proceed best-effort.
    assert!(update_needed("unknown", Some("1.0.0")));
    assert!(update_needed("1.0.0", None));
}
