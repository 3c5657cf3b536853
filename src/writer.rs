use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::{matching::MatchedJet, traits::WriteMatch};

/// The two header lines at the top of each output file
pub const HEADER: [&str; 2] = [
    "The file contains 4 vectors of matched parton and reco jets. The columns are",
    "Pt_p Eta_p Phi_p E_p Pt_r Eta_r Phi_r E_r",
];

/// Writer for matched jets in plain text
///
/// Each line holds the transverse momentum, rapidity, azimuthal angle
/// and energy of the clustered jet, followed by the transverse
/// momentum, pseudorapidity, azimuthal angle and energy of the matched
/// calorimeter jet.
#[derive(Debug)]
pub struct TextWriter<W: Write> {
    out: W,
    nwritten: usize,
}

/// Buffered text writer to a file
pub type FileWriter = TextWriter<BufWriter<File>>;

impl<W: Write> TextWriter<W> {
    /// Construct a new writer and write the header
    pub fn new(mut out: W) -> Result<Self, io::Error> {
        for line in HEADER {
            writeln!(out, "{line}")?;
        }
        Ok(Self { out, nwritten: 0 })
    }

    /// Number of matched jets written so far
    pub fn nwritten(&self) -> usize {
        self.nwritten
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl FileWriter {
    /// Create the file at `path` and write the header
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, CreateError> {
        let path = path.as_ref();
        debug!("Writing to {path:?}");
        let to_err = |err| CreateError::IoError(path.to_owned(), err);
        let file = File::create(path).map_err(to_err)?;
        Self::new(BufWriter::new(file)).map_err(to_err)
    }
}

impl<W: Write> WriteMatch for TextWriter<W> {
    type Error = io::Error;

    fn write(&mut self, m: &MatchedJet) -> Result<(), Self::Error> {
        let p = &m.parton_jet;
        let r = &m.calo.jet;
        writeln!(
            self.out,
            "{} {} {} {} {} {} {} {}",
            p.pt(),
            p.rap(),
            p.phi(),
            p.e(),
            r.pt,
            r.eta,
            r.phi,
            r.e
        )?;
        self.nwritten += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.out.flush()
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("Failed to create output file {0:?}: {1}")]
    IoError(PathBuf, io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cluster::ClusteredJet,
        event::RecoJet,
        four_vector::FourVector,
        matching::Match,
    };

    fn matched() -> MatchedJet {
        let parton_jet: ClusteredJet =
            FourVector::from_pxpypze(30., 40., 0., 60.).into();
        let calo = Match {
            index: 2,
            jet: RecoJet { pt: 40., eta: 0.11, phi: 0.19, e: 45. },
            delta_r: 0.01,
        };
        let gen = Match {
            index: 0,
            jet: RecoJet { pt: 47., eta: 0.1, phi: 0.2, e: 52.5 },
            delta_r: 0.02,
        };
        MatchedJet { parton_jet, calo, gen }
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.to_owned())
            .collect()
    }

    #[test]
    fn header_only() {
        let mut writer = TextWriter::new(Vec::new()).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.nwritten(), 0);
        assert_eq!(lines(writer.into_inner()), HEADER);
    }

    #[test]
    fn write_line() {
        let mut writer = TextWriter::new(Vec::new()).unwrap();
        let m = matched();
        writer.write(&m).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.nwritten(), 1);

        let lines = lines(writer.into_inner());
        assert_eq!(lines.len(), 3);
        let expected = format!(
            "50 0 {} 60 40 0.11 0.19 45",
            m.parton_jet.phi()
        );
        assert_eq!(lines[2], expected);
    }

    #[test]
    fn create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut writer = FileWriter::create(&path).unwrap();
        writer.write(&matched()).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with(HEADER[0]));
    }

    #[test]
    fn create_in_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(FileWriter::create(path).is_err());
    }
}
