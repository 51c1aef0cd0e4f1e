use std::io::{self, Read, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::info;

use bin_core::codec::{parse_wire_map, wire_map_to_json};
use bin_core::fs::write_atomic;
use bin_core::Artifact;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs, DecodeArgs, EncodeArgs, TypeArgs};
use crate::errors::CliError;

pub fn handle_encode(ctx: &AppContext, args: &EncodeArgs) -> anyhow::Result<()> {
    let artifact = match (args.text.as_deref(), args.path.as_deref()) {
        (Some(text), _) => {
            let name = args
                .name
                .as_deref()
                .ok_or_else(|| CliError::invalid_input("--text requires --name"))?;
            Artifact::from_text(name, text, args.description.as_deref().unwrap_or_default())
        }
        (None, Some(path)) => {
            let mut artifact =
                Artifact::from_path(path).map_err(|e| CliError::from_core(e, path))?;
            if let Some(name) = args.name.as_deref() {
                artifact = artifact.with_name(name);
            }
            if let Some(description) = args.description.as_deref() {
                artifact = artifact.with_description(description);
            }
            artifact
        }
        (None, None) => {
            return Err(CliError::invalid_input("Pass a PATH or --text with --name").into())
        }
    };

    if !artifact.available() {
        return Err(CliError::invalid_input("Artifact name cannot be empty").into());
    }

    let codec = ctx.codec()?;
    let key = ctx.key()?;
    let map = codec
        .wire_map(key.as_bytes(), &artifact)
        .map_err(|e| CliError::from_core(e, artifact.name()))?;
    let json = wire_map_to_json(&map)?;

    info!(
        id = %artifact.id(),
        name = artifact.name(),
        content_type = %codec.content_type(&artifact),
        size = artifact.content().len(),
        "encoded artifact"
    );

    match args.output.as_deref() {
        Some(output) => write_atomic(Path::new(output), format!("{}\n", json).as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", output, e))?,
        None => println!("{}", json),
    }
    Ok(())
}

pub fn handle_decode(ctx: &AppContext, args: &DecodeArgs) -> anyhow::Result<()> {
    let json = read_input(&args.input)?;
    let map = parse_wire_map(&json).map_err(|e| CliError::from_core(e, &args.input))?;

    let codec = ctx.codec()?;
    let key = ctx.key()?;
    let artifact = codec
        .decode_map(&map, key.as_bytes())
        .map_err(|e| CliError::from_core(e, &args.input))?;

    if !artifact.available() {
        return Err(CliError::invalid_input(format!(
            "Wire map {} decoded to an artifact with no name",
            args.input
        ))
        .into());
    }

    info!(
        id = %artifact.id(),
        name = artifact.name(),
        content_type = %codec.content_type(&artifact),
        size = artifact.content().len(),
        "decoded artifact"
    );

    match args.output.as_deref() {
        Some(output) => artifact
            .save(output)
            .map_err(|e| CliError::from_core(e, output))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(artifact.content())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub fn handle_type(args: &TypeArgs) -> anyhow::Result<()> {
    let artifact =
        Artifact::from_path(&args.path).map_err(|e| CliError::from_core(e, &args.path))?;
    println!("{}", artifact.content_type());
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "bin", &mut io::stdout());
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(input).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CliError::not_found(
                format!("Input not found: {}", input),
                "Hint: Pass the path to a JSON wire map, or - for stdin.",
            )
            .into()
        } else {
            anyhow::anyhow!("Failed to read {}: {}", input, e)
        }
    })
}
