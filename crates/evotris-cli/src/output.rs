use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination of a JSON document: a file, or stdout when no path is given.
#[derive(Debug)]
pub enum JsonOutput {
    Stdout,
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl JsonOutput {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout);
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let display_path = self.display_path();
        let result = match &mut self {
            Self::Stdout => write_pretty(&mut io::stdout().lock(), value),
            Self::File { writer, .. } => write_pretty(writer, value),
        };
        result.with_context(|| format!("Failed to write JSON to {display_path}"))
    }
}

fn write_pretty<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` as pretty JSON to `path`, or to stdout if `None`.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    JsonOutput::create(path)?.write(value)
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Line-oriented log file, truncated on creation and flushed after every
/// line.
#[derive(Debug)]
pub struct LineLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl LineLog {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append<T>(&mut self, value: T) -> io::Result<()>
    where
        T: std::fmt::Display,
    {
        writeln!(self.writer, "{value}")?;
        self.writer.flush()
    }
}
