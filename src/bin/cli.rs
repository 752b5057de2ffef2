//! shardfile CLI
//!
//! Command-line tooling over shard files: inspect headers, build a
//! shard from files, and fetch objects by key.

use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};
use tracing_subscriber::{fmt, EnvFilter};

use shardfile::{ShardKey, ShardReader, ShardWriter, KEY_LEN};

/// shardfile CLI
#[derive(Parser, Debug)]
#[command(name = "shardfile")]
#[command(about = "Write-once object shards indexed by a minimal perfect hash")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display shard file information
    Info {
        /// Shard files to inspect
        #[arg(required = true)]
        shards: Vec<PathBuf>,
    },

    /// Create a shard file from the given files
    Create {
        /// Output shard file
        shard: PathBuf,

        /// Input files; a single "-" reads the file list from stdin
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sort files by reversed file name before adding them; may help
        /// compression ratio when the shard file is compressed afterwards
        #[arg(long)]
        sorted: bool,
    },

    /// Fetch objects by key and write them to stdout
    Get {
        /// Shard file
        shard: PathBuf,

        /// Object keys, hex encoded
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Info { shards } => info(&shards),
        Commands::Create {
            shard,
            files,
            sorted,
        } => create(&shard, files, sorted),
        Commands::Get { shard, keys } => get(&shard, &keys),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn info(shards: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    for path in shards {
        let reader = ShardReader::open(path)?;
        let h = reader.header();
        println!("Shard {}", path.display());
        println!("├─version:    {}", h.version);
        println!("├─objects:    {}", h.objects_count);
        println!("│ ├─position: {}", h.objects_position);
        println!("│ └─size:     {}", h.objects_size);
        println!("├─index");
        println!("│ ├─position: {}", h.index_position);
        println!("│ └─size:     {}", h.index_size);
        println!("└─hash");
        println!("  └─position: {}", h.hash_position);
    }
    Ok(())
}

fn create(shard: &Path, files: Vec<PathBuf>, sorted: bool) -> Result<(), Box<dyn Error>> {
    let files = if files.len() == 1 && files[0].as_os_str() == "-" {
        // read file names from stdin
        let mut list = String::new();
        io::stdin().read_to_string(&mut list)?;
        list.lines()
            .map(|line| PathBuf::from(line.trim()))
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    } else {
        files
    };
    println!("There are {} entries", files.len());

    // Content-address each file, dropping unreadable ones and duplicates
    let mut seen: HashSet<ShardKey> = HashSet::new();
    let mut to_add: Vec<(PathBuf, ShardKey)> = Vec::new();
    for path in files {
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        let key: ShardKey = Sha256::digest(&data).into();
        if seen.insert(key) {
            to_add.push((path, key));
        }
    }
    println!("after deduplication: {} entries", to_add.len());

    if sorted {
        to_add.sort_by_key(|(path, _)| {
            path.to_string_lossy().bytes().rev().collect::<Vec<u8>>()
        });
    }

    let mut writer = ShardWriter::create(shard, to_add.len() as u64)?;
    for (path, key) in &to_add {
        let data = fs::read(path)?;
        writer.write(key, &data)?;
    }
    writer.finalize()?;
    println!("Done");
    Ok(())
}

fn get(shard: &Path, keys: &[String]) -> Result<(), Box<dyn Error>> {
    let mut reader = ShardReader::open(shard)?;
    let mut stdout = io::stdout().lock();
    for hexkey in keys {
        let bytes = hex::decode(hexkey)?;
        let key: ShardKey = bytes
            .as_slice()
            .try_into()
            .map_err(|_| format!("key {} is not {} bytes", hexkey, KEY_LEN))?;
        let object = reader.lookup(&key)?;
        stdout.write_all(&object)?;
    }
    Ok(())
}
