use std::{ffi::OsStr, process::Output};

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use glob::{glob, Pattern};
use tokio::process::Command;
use tracing::{debug, info, warn};

fn has_files(dir: &Utf8Path, extension: &str) -> Result<bool> {
    let pattern = format!("{}/*.{extension}", Pattern::escape(dir.as_str()));

    Ok(glob(&pattern)?.next().is_some())
}

async fn run<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("{program} couldn't be started, check the executables config"))?;

    if !output.status.success() {
        bail!(
            "{program} failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(output)
}

/// Writes the release name and the ripper email into the image metadata
#[derive(Debug, Clone)]
pub struct Exiftool<'a> {
    path: &'a str,
}

impl<'a> Exiftool<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { path }
    }

    fn arguments(title: &str, email: &str) -> Vec<String> {
        [
            ("XPComment", email),
            ("Artist", email),
            ("XPAuthor", email),
            ("XPTitle", title),
            ("ImageDescription", title),
            ("Title", title),
            ("Description", title),
        ]
        .into_iter()
        .map(|(tag, value)| format!("-{tag}={value}"))
        .chain(["-overwrite_original_in_place".to_string()])
        .collect()
    }

    /// Tags every jpeg and tiff of `dir`
    pub async fn tag(&self, dir: &Utf8Path, title: &str, email: &str) -> Result<()> {
        let extensions = ["jpg", "jpeg", "tif", "tiff"]
            .into_iter()
            .filter_map(|extension| match has_files(dir, extension) {
                Ok(true) => Some(Ok(extension)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
            .collect::<Result<Vec<_>>>()?;

        if extensions.is_empty() {
            warn!("no jpeg or tiff in {dir}, skipping metadata");
            return Ok(());
        }

        let mut args = Self::arguments(title, email);
        for extension in extensions {
            args.push("-ext".to_string());
            args.push(extension.to_string());
        }
        args.push(dir.to_string());

        debug!("running {} {args:?}", self.path);
        run(self.path, &args).await?;
        info!("tagged images of {dir} as {title:?}");

        Ok(())
    }
}

/// Lossless image optimizer
#[derive(Debug, Clone)]
pub struct Pingo<'a> {
    path: &'a str,
}

impl<'a> Pingo<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { path }
    }

    /// The `N files => X MB - (Y%) saved` summary line of pingo
    fn summary(output: &Output) -> Option<String> {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .find(|line| line.to_lowercase().ends_with("saved"))
            .map(ToString::to_string)
    }

    /// Optimizes every jpeg, png and webp of `dir`
    pub async fn optimize(&self, dir: &Utf8Path, aggressive: bool) -> Result<()> {
        let passes: [(&str, &[&str]); 3] = [
            ("jpg", if aggressive { &["-s0", "-jpgtype=1"] } else { &["-s0"] }),
            ("png", &["-sb"]),
            ("webp", &["-s9"]),
        ];

        for (extension, flags) in passes {
            if !has_files(dir, extension)? {
                continue;
            }

            info!("optimizing {extension} files...");
            let args = ["-strip"]
                .into_iter()
                .chain(flags.iter().copied())
                .map(ToString::to_string)
                .chain([format!("{dir}/*.{extension}")])
                .collect::<Vec<_>>();
            let output = run(self.path, &args).await?;

            match Self::summary(&output) {
                Some(summary) => info!("optimized {extension} files: {summary}"),
                None => info!("optimized {extension} files"),
            }
        }

        Ok(())
    }
}
