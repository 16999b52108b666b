use crate::{
    core::{CertificateStore, RoutingConfiguration},
    index::{Build, Builder, SecretLoader, Store},
    manifest,
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "tcp-route-controller",
    about = "Builds TCP routing configuration from IngressRouteTCP resources"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "tcp_route_controller=info,warn",
        env = "TCP_ROUTE_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Only routes annotated with this ingress class are processed.
    ///
    /// When unset, routes without an ingress class annotation, or annotated with the default
    /// class, are processed.
    #[clap(long, default_value = "", env = "TCP_ROUTE_CONTROLLER_INGRESS_CLASS")]
    ingress_class: String,

    /// YAML manifests holding IngressRouteTCP, Service, Endpoints, and Secret resources.
    ///
    /// `-` reads from stdin.
    #[clap(long = "manifests", short = 'f', required = true, num_args = 1..)]
    manifests: Vec<PathBuf>,

    #[clap(long, value_enum, default_value = "json")]
    output_format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// The dynamic configuration document written by the controller.
#[derive(serde::Serialize)]
struct Output<'c> {
    tcp: &'c RoutingConfiguration,
}

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            ingress_class,
            manifests,
            output_format,
        } = self;

        log_format
            .try_init(log_level)
            .map_err(|error| anyhow!("failed to initialize logging: {error}"))?;

        let mut store = Store::default();
        for path in &manifests {
            let contents = read_manifest(path)?;
            let resources = manifest::apply(&mut store, &contents)
                .with_context(|| format!("failed to load {}", path.display()))?;
            info!(path = %path.display(), resources, "Loaded manifest");
        }

        let loader = SecretLoader::new(&store);
        let mut certs = CertificateStore::default();
        let Build {
            config,
            diagnostics,
        } = Builder::new(&store, &loader, &ingress_class).build(&mut certs);
        diagnostics.emit();
        info!(
            routers = config.routers.len(),
            services = config.services.len(),
            certificates = certs.len(),
            diagnostics = diagnostics.len(),
            "Built configuration",
        );

        write_config(&config, output_format, io::stdout().lock())
    }
}

fn read_manifest(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .context("failed to read stdin")?;
        return Ok(contents);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) fn write_config(
    config: &RoutingConfiguration,
    format: OutputFormat,
    mut out: impl Write,
) -> Result<()> {
    let output = Output { tcp: config };
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &output)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut out, &output)?,
    }
    out.flush()?;
    Ok(())
}
