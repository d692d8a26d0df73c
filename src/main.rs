// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

/// Print the screen rectangle of a tray icon.
#[derive(Debug, Parser)]
#[command(name = "tray-icon-rect", version, about)]
struct Cli {
    /// Start of the icon's tooltip text (case-sensitive)
    label: String,

    /// Print JSON instead of `left top right bottom`
    #[arg(long)]
    json: bool,

    /// Log lookup steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries only the result
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let rect = match tray_icon_rect::locate_tray_icon_rect(&cli.label) {
        Ok(rect) => rect,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string(&rect) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("encode: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", rect);
    }
}
