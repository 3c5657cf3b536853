//! Trees in sub-directories of ROOT files
//!
//! `oxyroot` only finds objects among the top-level keys of a file. To
//! read from a sub-directory, we make a copy of the file in which the
//! record of the top-level directory points to the key list of the
//! sub-directory. All other offsets in a ROOT file are absolute, so
//! the objects in the sub-directory stay readable in the copy.
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::debug;
use oxyroot::{Named, RootFile};
use tempfile::NamedTempFile;
use thiserror::Error;

const ROOT_MAGIC: &[u8; 4] = b"root";
const FILE_VERSION_POS: u64 = 4;
const FILE_BEGIN_POS: u64 = 8;
// behind fVersion, fBEGIN, fEND, fSeekFree, fNbytesFree, nfree
const SMALL_FILE_NBYTES_NAME_POS: u64 = 28;
const BIG_FILE_NBYTES_NAME_POS: u64 = 36;
const BIG_FILE_VERSION: i32 = 1_000_000;

// behind fNbytes, fVersion, fObjlen, fDatime
const KEY_LEN_POS: u64 = 14;

// behind fVersion, fDatimeC, fDatimeM
const NBYTES_KEYS_POS: usize = 10;
// behind fNbytesKeys, fNbytesName
const SEEK_DIR_POS: usize = 18;
const MAX_RECORD_LEN: usize = SEEK_DIR_POS + 3 * 8;
const BIG_RECORD_VERSION: i16 = 1000;

const DIRECTORY_CLASSES: [&str; 2] = ["TDirectory", "TDirectoryFile"];

/// Whether objects of class `class` are directories
pub fn is_directory(class: &str) -> bool {
    DIRECTORY_CLASSES.iter().any(|c| *c == class)
}

/// Split a tree path like `demo/eventTree` into directory and tree name
pub fn split_tree_path(tree_path: &str) -> (&str, &str) {
    let tree_path = tree_path.trim_matches('/');
    tree_path.rsplit_once('/').unwrap_or(("", tree_path))
}

/// A ROOT file seen from one of its directories
#[derive(Debug)]
pub struct DirectoryView {
    path: PathBuf,
    view: Option<NamedTempFile>,
}

impl DirectoryView {
    /// Descend into directory `dir` of the file at `path`
    ///
    /// Nested directories are separated by `/`. For an empty `dir`
    /// the file itself is used. Fails if the file does not start with
    /// the ROOT magic bytes.
    pub fn open<P: AsRef<Path>>(
        path: P,
        dir: &str,
    ) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        top_dir_pos(&mut File::open(path)?)?;
        let mut view: Option<NamedTempFile> = None;
        for name in dir.split('/').filter(|n| !n.is_empty()) {
            let current = view.as_ref().map_or(path, |v| v.path());
            let next = enter(current, name)?;
            view = Some(next);
        }
        Ok(Self {
            path: path.to_owned(),
            view,
        })
    }

    /// Path of a ROOT file with the directory at its top level
    pub fn path(&self) -> &Path {
        self.view.as_ref().map_or(self.path.as_path(), |v| v.path())
    }
}

/// Location of the key list of a directory
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
struct KeyList {
    nbytes: i32,
    seek: i64,
}

/// Leading part of a directory record
#[derive(Copy, Clone, Debug)]
struct DirRecord {
    pos: u64,
    buf: [u8; MAX_RECORD_LEN],
}

impl DirRecord {
    fn read(file: &mut File, pos: u64) -> io::Result<Self> {
        Ok(Self {
            pos,
            buf: read_at(file, pos)?,
        })
    }

    fn write(&self, file: &mut File) -> io::Result<()> {
        file.seek(SeekFrom::Start(self.pos))?;
        file.write_all(&self.buf)
    }

    fn is_big(&self) -> bool {
        i16::from_be_bytes([self.buf[0], self.buf[1]]) > BIG_RECORD_VERSION
    }

    // behind fSeekDir, fSeekParent
    fn seek_keys_pos(&self) -> usize {
        if self.is_big() {
            SEEK_DIR_POS + 2 * 8
        } else {
            SEEK_DIR_POS + 2 * 4
        }
    }

    fn key_list(&self) -> KeyList {
        let pos = self.seek_keys_pos();
        let seek = if self.is_big() {
            let mut seek = [0; 8];
            seek.copy_from_slice(&self.buf[pos..pos + 8]);
            i64::from_be_bytes(seek)
        } else {
            be_i32(&self.buf, pos).into()
        };
        KeyList {
            nbytes: be_i32(&self.buf, NBYTES_KEYS_POS),
            seek,
        }
    }

    fn set_key_list(&mut self, keys: KeyList) -> Result<(), DirectoryError> {
        self.buf[NBYTES_KEYS_POS..NBYTES_KEYS_POS + 4]
            .copy_from_slice(&keys.nbytes.to_be_bytes());
        let pos = self.seek_keys_pos();
        if self.is_big() {
            self.buf[pos..pos + 8].copy_from_slice(&keys.seek.to_be_bytes());
        } else {
            let seek = i32::try_from(keys.seek)
                .map_err(|_| DirectoryError::SeekOverflow(keys.seek))?;
            self.buf[pos..pos + 4].copy_from_slice(&seek.to_be_bytes());
        }
        Ok(())
    }
}

fn be_i32(buf: &[u8], pos: usize) -> i32 {
    let mut val = [0; 4];
    val.copy_from_slice(&buf[pos..pos + 4]);
    i32::from_be_bytes(val)
}

fn read_at<const N: usize>(file: &mut File, pos: u64) -> io::Result<[u8; N]> {
    let mut buf = [0; N];
    file.seek(SeekFrom::Start(pos))?;
    file.read_exact(&mut buf)?;
    Ok(buf)
}

fn to_pos(pos: i64) -> Result<u64, DirectoryError> {
    u64::try_from(pos).map_err(|_| DirectoryError::BadOffset(pos))
}

/// Position of the top-level directory record
fn top_dir_pos(file: &mut File) -> Result<u64, DirectoryError> {
    let magic: [u8; 4] = read_at(file, 0)?;
    if &magic != ROOT_MAGIC {
        return Err(DirectoryError::NotRootFile);
    }
    let version = i32::from_be_bytes(read_at(file, FILE_VERSION_POS)?);
    let begin = i32::from_be_bytes(read_at(file, FILE_BEGIN_POS)?);
    let nbytes_name_pos = if version > BIG_FILE_VERSION {
        BIG_FILE_NBYTES_NAME_POS
    } else {
        SMALL_FILE_NBYTES_NAME_POS
    };
    let nbytes_name = i32::from_be_bytes(read_at(file, nbytes_name_pos)?);
    to_pos(i64::from(begin) + i64::from(nbytes_name))
}

/// Key list of the top-level sub-directory `name`
fn sub_dir_keys(path: &Path, name: &str) -> Result<KeyList, DirectoryError> {
    let root = RootFile::open(path).map_err(|err| DirectoryError::OpenError {
        path: path.to_owned(),
        msg: err.to_string(),
    })?;
    // the last key holds the highest cycle
    let key = root
        .keys()
        .into_iter()
        .filter(|k| k.name() == name)
        .last()
        .ok_or_else(|| DirectoryError::MissingDirectory(name.to_owned()))?;
    if !is_directory(key.class_name()) {
        return Err(DirectoryError::NotADirectory {
            name: name.to_owned(),
            class: key.class_name().to_owned(),
        });
    }

    let mut file = File::open(path)?;
    let seek_key = to_pos(key.seek_key())?;
    let key_len = i16::from_be_bytes(read_at(&mut file, seek_key + KEY_LEN_POS)?);
    let record_pos = to_pos(key.seek_key() + i64::from(key_len))?;
    let keys = DirRecord::read(&mut file, record_pos)?.key_list();
    debug!("Directory `{name}` has its keys at {}", keys.seek);
    Ok(keys)
}

/// Copy of the file at `path` with sub-directory `name` at the top level
fn enter(path: &Path, name: &str) -> Result<NamedTempFile, DirectoryError> {
    let keys = sub_dir_keys(path, name)?;
    let view = NamedTempFile::new()?;
    fs::copy(path, view.path())?;
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(view.path())?;
    let pos = top_dir_pos(&mut file)?;
    let mut record = DirRecord::read(&mut file, pos)?;
    record.set_key_list(keys)?;
    record.write(&mut file)?;
    file.flush()?;
    Ok(view)
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to open ROOT file {path:?}: {msg}")]
    OpenError { path: PathBuf, msg: String },
    #[error("Directory `{0}` not found")]
    MissingDirectory(String),
    #[error("`{name}` is a {class}, not a directory")]
    NotADirectory { name: String, class: String },
    #[error("Not a ROOT file")]
    NotRootFile,
    #[error("Invalid file offset {0}")]
    BadOffset(i64),
    #[error("Key list at {0} is out of reach of a 32 bit directory record")]
    SeekOverflow(i64),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}
