//! CLI command implementations.

use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::host::{Host, Layout};
use crate::recipe::Recipe;
use crate::runtime::Runtime;

/// Print the recipe metadata.
pub fn inspect<T: Recipe, W: Write>(recipe: &T, json: bool, out: &mut W) -> Result<()> {
    let metadata = recipe.metadata();
    if json {
        serde_json::to_writer_pretty(&mut *out, metadata)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", metadata)?;
    }
    Ok(())
}

/// Stage the build folder into the package folder.
#[tracing::instrument(skip(runtime, recipe, out))]
pub fn package<R: Runtime, T: Recipe, W: Write>(
    runtime: R,
    recipe: &T,
    layout: Layout,
    out: &mut W,
) -> Result<()> {
    let host = Host::new(runtime, layout);
    host.stage(recipe)?;
    writeln!(
        out,
        "{}: Package folder {}",
        recipe.metadata().reference()?,
        host.layout().package_folder.display()
    )?;
    Ok(())
}

/// Report the link libraries of an already staged package folder.
#[tracing::instrument(skip(runtime, recipe, out))]
pub fn info<R: Runtime, T: Recipe, W: Write>(
    runtime: R,
    recipe: &T,
    layout: Layout,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let host = Host::new(runtime, layout);
    let info = host.report(recipe)?;
    debug!("Reported {} lib(s)", info.libs.len());

    if json {
        serde_json::to_writer_pretty(&mut *out, &info)?;
        writeln!(out)?;
    } else {
        print_libs(out, &info.libs)?;
    }
    Ok(())
}

/// Stage, report, and write the package manifest.
#[tracing::instrument(skip(runtime, recipe, out))]
pub fn export_pkg<R: Runtime, T: Recipe, W: Write>(
    runtime: R,
    recipe: &T,
    layout: Layout,
    out: &mut W,
) -> Result<()> {
    let host = Host::new(runtime, layout);
    let outcome = host.export(recipe)?;

    writeln!(
        out,
        "{}: Package '{}' created",
        outcome.manifest.reference,
        host.layout().package_folder.display()
    )?;
    print_libs(out, &outcome.manifest.info.libs)?;
    writeln!(out, "Manifest: {}", outcome.manifest_path.display())?;
    Ok(())
}

fn print_libs<W: Write>(out: &mut W, libs: &[String]) -> Result<()> {
    if libs.is_empty() {
        writeln!(out, "libs: (none)")?;
    } else {
        writeln!(out, "libs: {}", libs.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::DDoSDetectorRecipe;
    use crate::runtime::{MockRuntime, RealRuntime};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn package_cmd<W: Write>(build: &Path, pkg: &Path, out: &mut W) {
        package(
            RealRuntime,
            &DDoSDetectorRecipe::new(),
            Layout::new(build, pkg),
            out,
        )
        .unwrap();
    }

    #[test]
    fn test_inspect_text() {
        let mut buf = Vec::new();
        inspect(&DDoSDetectorRecipe::new(), false, &mut buf).unwrap();

        let text = output(buf);
        assert!(text.starts_with("name: DDoSDetector\nversion: 0.1\n"));
        assert!(text.contains("description: DDoS Detector\n"));
        assert!(text.contains("license: None\n"));
        assert!(text.contains("url: None\n"));
    }

    #[test]
    fn test_inspect_json() {
        let mut buf = Vec::new();
        inspect(&DDoSDetectorRecipe::new(), true, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(value["name"], "DDoSDetector");
        assert_eq!(value["version"], "0.1");
        assert!(value["author"].is_null());
    }

    #[test]
    fn test_info_with_no_libraries() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);

        let mut buf = Vec::new();
        info(
            runtime,
            &DDoSDetectorRecipe::new(),
            Layout::new("/build", "/pkg"),
            false,
            &mut buf,
        )
        .unwrap();

        assert_eq!(output(buf), "libs: (none)\n");
    }

    #[test]
    fn test_info_json() {
        let package = tempdir().unwrap();
        fs::write(package.path().join("libfoo.a"), b"!<arch>\n").unwrap();

        let mut buf = Vec::new();
        info(
            RealRuntime,
            &DDoSDetectorRecipe::new(),
            Layout::new("/unused", package.path()),
            true,
            &mut buf,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(value["libs"], serde_json::json!(["foo"]));
        assert_eq!(
            PathBuf::from(value["rootpath"].as_str().unwrap()),
            package.path()
        );
    }

    #[test]
    fn test_package_then_export() {
        let build = tempdir().unwrap();
        let package = build.path().join("package");
        fs::create_dir_all(build.path().join("lib")).unwrap();
        fs::write(build.path().join("lib/libDDoSDetector.so"), b"\x7fELF").unwrap();

        let mut buf = Vec::new();
        package_cmd(build.path(), &package, &mut buf);
        assert!(output(buf).starts_with("DDoSDetector/0.1: Package folder "));
        assert!(package.join("lib/libDDoSDetector.so").exists());

        let mut buf = Vec::new();
        export_pkg(
            RealRuntime,
            &DDoSDetectorRecipe::new(),
            Layout::new(build.path(), &package),
            &mut buf,
        )
        .unwrap();

        let text = output(buf);
        assert!(text.contains("libs: DDoSDetector\n"));
        assert!(package.join("package_info.json").exists());
        assert!(!package.join("package").exists());
    }
}
