use std::path::{Path, PathBuf};

use itertools::izip;
use log::{debug, info};
use oxyroot::{Named, ReaderTree, RootFile};
use thiserror::Error;

use crate::{
    directory::{is_directory, split_tree_path, DirectoryError, DirectoryView},
    event::{Event, EventBuilder, JetCollection, Parton, RecoJet},
    traits::Rewind,
};

/// Default path of the event tree inside the ROOT file
pub const DEFAULT_TREE: &str = "demo/eventTree";

/// Branch names of one jet collection
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JetBranches {
    pub pt: String,
    pub eta: String,
    pub phi: String,
    pub e: String,
}

impl JetBranches {
    /// Branches `{prefix}Pt`, `{prefix}Eta`, `{prefix}Phi`, `{prefix}E`
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            pt: format!("{prefix}Pt"),
            eta: format!("{prefix}Eta"),
            phi: format!("{prefix}Phi"),
            e: format!("{prefix}E"),
        }
    }
}

/// Names of all branches read from the event tree
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BranchNames {
    pub parton_px: String,
    pub parton_py: String,
    pub parton_pz: String,
    pub parton_e: String,
    pub parton_status: String,
    pub calo_jets: JetBranches,
    pub gen_jets: JetBranches,
}

impl Default for BranchNames {
    fn default() -> Self {
        Self {
            parton_px: "partonPx".to_owned(),
            parton_py: "partonPy".to_owned(),
            parton_pz: "partonPz".to_owned(),
            parton_e: "partonE".to_owned(),
            parton_status: "partonStatus".to_owned(),
            calo_jets: JetBranches::with_prefix("pfJet"),
            gen_jets: JetBranches::with_prefix("genJet"),
        }
    }
}

impl BranchNames {
    pub fn jets(&self, collection: JetCollection) -> &JetBranches {
        match collection {
            JetCollection::Calo => &self.calo_jets,
            JetCollection::Gen => &self.gen_jets,
        }
    }
}

/// Per-event values of one jet collection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JetColumns {
    pub pt: Vec<Vec<f32>>,
    pub eta: Vec<Vec<f32>>,
    pub phi: Vec<Vec<f32>>,
    pub e: Vec<Vec<f32>>,
}

impl JetColumns {
    fn read(tree: &ReaderTree, names: &JetBranches) -> Result<Self, CreateError> {
        Ok(Self {
            pt: read_f32_column(tree, &names.pt)?,
            eta: read_f32_column(tree, &names.eta)?,
            phi: read_f32_column(tree, &names.phi)?,
            e: read_f32_column(tree, &names.e)?,
        })
    }

    fn entries(&self) -> [usize; 4] {
        [self.pt.len(), self.eta.len(), self.phi.len(), self.e.len()]
    }
}

/// Per-event values of all branches
///
/// The outer index is the event number, the inner one the position
/// of the parton or jet within the event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventColumns {
    pub parton_px: Vec<Vec<f32>>,
    pub parton_py: Vec<Vec<f32>>,
    pub parton_pz: Vec<Vec<f32>>,
    pub parton_e: Vec<Vec<f32>>,
    pub parton_status: Vec<Vec<i32>>,
    pub calo_jets: JetColumns,
    pub gen_jets: JetColumns,
}

impl EventColumns {
    /// Read all columns from a tree
    pub fn read(tree: &ReaderTree, names: &BranchNames) -> Result<Self, CreateError> {
        Ok(Self {
            parton_px: read_f32_column(tree, &names.parton_px)?,
            parton_py: read_f32_column(tree, &names.parton_py)?,
            parton_pz: read_f32_column(tree, &names.parton_pz)?,
            parton_e: read_f32_column(tree, &names.parton_e)?,
            parton_status: read_i32_column(tree, &names.parton_status)?,
            calo_jets: JetColumns::read(tree, &names.calo_jets)?,
            gen_jets: JetColumns::read(tree, &names.gen_jets)?,
        })
    }

    /// The common number of events in all columns
    fn nevents(&self) -> Result<usize, CreateError> {
        let nevents = self.parton_px.len();
        let entries = [
            self.parton_py.len(),
            self.parton_pz.len(),
            self.parton_e.len(),
            self.parton_status.len(),
        ]
        .into_iter()
        .chain(self.calo_jets.entries())
        .chain(self.gen_jets.entries());
        for n in entries {
            if n != nevents {
                return Err(CreateError::EntryMismatch {
                    expected: nevents,
                    found: n,
                });
            }
        }
        Ok(nevents)
    }

    fn jets(&self, collection: JetCollection) -> &JetColumns {
        match collection {
            JetCollection::Calo => &self.calo_jets,
            JetCollection::Gen => &self.gen_jets,
        }
    }

    fn event(&self, id: usize) -> Result<Event, ReadError> {
        let px = &self.parton_px[id];
        let npartons = px.len();
        let py = &self.parton_py[id];
        let pz = &self.parton_pz[id];
        let e = &self.parton_e[id];
        let status = &self.parton_status[id];
        for (column, n) in [
            ("py", py.len()),
            ("pz", pz.len()),
            ("e", e.len()),
            ("status", status.len()),
        ] {
            check_len(id, "parton", column, npartons, n)?;
        }

        let mut event = EventBuilder::with_capacity(id, npartons);
        for (&px, &py, &pz, &e, &status) in izip!(px, py, pz, e, status) {
            event.add_parton(Parton { px, py, pz, e, status });
        }

        for collection in [JetCollection::Calo, JetCollection::Gen] {
            let jets = self.jets(collection);
            let pt = &jets.pt[id];
            let eta = &jets.eta[id];
            let phi = &jets.phi[id];
            let e = &jets.e[id];
            let group = match collection {
                JetCollection::Calo => "calo jet",
                JetCollection::Gen => "gen jet",
            };
            for (column, n) in
                [("eta", eta.len()), ("phi", phi.len()), ("e", e.len())]
            {
                check_len(id, group, column, pt.len(), n)?;
            }
            for (&pt, &eta, &phi, &e) in izip!(pt, eta, phi, e) {
                event.add_jet(collection, RecoJet { pt, eta, phi, e });
            }
        }
        Ok(event.build())
    }
}

fn check_len(
    event: usize,
    group: &'static str,
    column: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), ReadError> {
    if expected == found {
        Ok(())
    } else {
        Err(ReadError::LengthMismatch {
            event,
            group,
            column,
            expected,
            found,
        })
    }
}

fn find_branch<'a>(
    tree: &'a ReaderTree,
    name: &str,
) -> Result<&'a oxyroot::Branch, CreateError> {
    tree.branch(name)
        .ok_or_else(|| CreateError::MissingBranch(name.to_owned()))
}

// the oxyroot error type is not public, so we only keep the message
fn branch_error<E: std::fmt::Display>(name: &str, err: E) -> CreateError {
    CreateError::BranchError {
        branch: name.to_owned(),
        msg: err.to_string(),
    }
}

fn read_f32_column(
    tree: &ReaderTree,
    name: &str,
) -> Result<Vec<Vec<f32>>, CreateError> {
    debug!("Reading branch {name}");
    let values = find_branch(tree, name)?
        .as_iter::<Vec<f32>>()
        .map_err(|err| branch_error(name, err))?
        .collect();
    Ok(values)
}

fn read_i32_column(
    tree: &ReaderTree,
    name: &str,
) -> Result<Vec<Vec<i32>>, CreateError> {
    debug!("Reading branch {name}");
    let values = find_branch(tree, name)?
        .as_iter::<Vec<i32>>()
        .map_err(|err| branch_error(name, err))?
        .collect();
    Ok(values)
}

/// Reader for the events in a ROOT tree
///
/// All columns are read into memory on construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeReader {
    columns: EventColumns,
    nevents: usize,
    current: usize,
}

impl TreeReader {
    /// Read the tree at `tree_path` from the ROOT file at `path`
    ///
    /// Leading components of `tree_path` separated by `/` name
    /// (nested) directories containing the tree.
    pub fn open<P: AsRef<Path>>(
        path: P,
        tree_path: &str,
        names: &BranchNames,
    ) -> Result<Self, CreateError> {
        let path = path.as_ref();
        debug!("Opening {path:?}");
        let (dir, tree_name) = split_tree_path(tree_path);
        let view = DirectoryView::open(path, dir).map_err(|err| match err {
            DirectoryError::MissingDirectory(_)
            | DirectoryError::NotADirectory { .. } => {
                CreateError::DirectoryError {
                    path: path.to_owned(),
                    dir: dir.to_owned(),
                    err,
                }
            }
            err => CreateError::OpenError {
                path: path.to_owned(),
                msg: err.to_string(),
            },
        })?;
        let mut file =
            RootFile::open(view.path()).map_err(|err| CreateError::OpenError {
                path: path.to_owned(),
                msg: err.to_string(),
            })?;
        let to_tree_err = |msg: String| CreateError::TreeError {
            tree: tree_path.to_owned(),
            msg,
        };
        if file
            .keys()
            .iter()
            .any(|k| k.name() == tree_name && is_directory(k.class_name()))
        {
            return Err(to_tree_err("not a tree but a directory".to_owned()));
        }
        let tree =
            file.get_tree(tree_name)
                .map_err(|err| to_tree_err(err.to_string()))?;
        let columns = EventColumns::read(&tree, names)?;
        let reader = Self::from_columns(columns)?;
        info!("Read {} events from {path:?}", reader.len());
        Ok(reader)
    }

    /// Reader from columns that are already in memory
    pub fn from_columns(columns: EventColumns) -> Result<Self, CreateError> {
        let nevents = columns.nevents()?;
        Ok(Self {
            columns,
            nevents,
            current: 0,
        })
    }

    /// Total number of events
    pub fn len(&self) -> usize {
        self.nevents
    }

    pub fn is_empty(&self) -> bool {
        self.nevents == 0
    }
}

impl Rewind for TreeReader {
    type Error = std::convert::Infallible;

    fn rewind(&mut self) -> Result<(), Self::Error> {
        self.current = 0;
        Ok(())
    }
}

impl Iterator for TreeReader {
    type Item = Result<Event, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.nevents {
            return None;
        }
        let event = self.columns.event(self.current);
        self.current += 1;
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.nevents - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TreeReader {}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("Failed to open ROOT file {path:?}: {msg}")]
    OpenError { path: PathBuf, msg: String },
    #[error("Failed to enter directory `{dir}` of {path:?}: {err}")]
    DirectoryError {
        path: PathBuf,
        dir: String,
        err: DirectoryError,
    },
    #[error("Failed to read tree `{tree}`: {msg}")]
    TreeError { tree: String, msg: String },
    #[error("Branch `{0}` not found")]
    MissingBranch(String),
    #[error("Failed to read branch `{branch}`: {msg}")]
    BranchError { branch: String, msg: String },
    #[error("Inconsistent number of entries: expected {expected}, found {found}")]
    EntryMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Event {event}: {group} {column} has {found} entries, expected {expected}")]
    LengthMismatch {
        event: usize,
        group: &'static str,
        column: &'static str,
        expected: usize,
        found: usize,
    },
}
