//! Multiple sequence alignment consumed by the scorers.

/// Amino acids in the order used by frequency vectors; the gap is the 21st symbol.
pub const AMINO_ACIDS: &[u8; 21] = b"ARNDCQEGHILKMFPSTWYV-";

/// Index of the gap symbol in [`AMINO_ACIDS`].
pub const GAP_INDEX: usize = 20;

/// Maps a residue to its index in [`AMINO_ACIDS`].
///
/// Anything outside the 20 amino acids is treated as a gap.
///
/// ```
/// use conscore::libs::alignment::{aa_index, GAP_INDEX};
/// assert_eq!(aa_index(b'A'), 0);
/// assert_eq!(aa_index(b'v'), 19);
/// assert_eq!(aa_index(b'-'), GAP_INDEX);
/// assert_eq!(aa_index(b'X'), GAP_INDEX);
/// ```
pub fn aa_index(residue: u8) -> usize {
    let upper = residue.to_ascii_uppercase();
    AMINO_ACIDS[..GAP_INDEX]
        .iter()
        .position(|&aa| aa == upper)
        .unwrap_or(GAP_INDEX)
}

pub fn is_gap(residue: u8) -> bool {
    aa_index(residue) == GAP_INDEX
}

/// Aligned rows of equal length. The first row is the reference sequence
/// whose columns are scored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    names: Vec<String>,
    msa: Vec<Vec<u8>>,
}

impl Alignment {
    /// ```
    /// use conscore::libs::alignment::Alignment;
    /// let aln = Alignment::new(
    ///     vec!["a".to_string(), "b".to_string()],
    ///     vec![b"ac-".to_vec(), b"ACD".to_vec()],
    /// )
    /// .unwrap();
    /// assert_eq!(aln.len(), 3);
    /// assert_eq!(aln.reference(), b"AC-");
    /// assert_eq!(aln.column(1), b"CC".to_vec());
    ///
    /// assert!(Alignment::new(
    ///     vec!["a".to_string(), "b".to_string()],
    ///     vec![b"AC".to_vec(), b"ACD".to_vec()],
    /// )
    /// .is_err());
    /// ```
    pub fn new(names: Vec<String>, msa: Vec<Vec<u8>>) -> anyhow::Result<Self> {
        if names.len() != msa.len() {
            return Err(anyhow::anyhow!(
                "{} names given for {} sequences",
                names.len(),
                msa.len()
            ));
        }

        if let Some(first) = msa.first() {
            for (name, row) in names.iter().zip(&msa) {
                if row.len() != first.len() {
                    return Err(anyhow::anyhow!(
                        "Sequence {} has length {}, expected {}",
                        name,
                        row.len(),
                        first.len()
                    ));
                }
            }
        }

        let msa = msa.into_iter().map(|row| row.to_ascii_uppercase()).collect();

        Ok(Self { names, msa })
    }

    /// Reads an aligned FASTA file. `stdin` and gzipped files are accepted.
    pub fn from_fasta(infile: &str) -> anyhow::Result<Self> {
        let reader = crate::reader(infile)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        let mut names = vec![];
        let mut msa = vec![];
        for result in fa_in.records() {
            let record = result?;
            names.push(String::from_utf8(record.name().into())?);
            msa.push(record.sequence().as_ref().to_vec());
        }

        Self::new(names, msa)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn msa(&self) -> &[Vec<u8>] {
        &self.msa
    }

    /// The first row, or an empty slice for an alignment without rows.
    pub fn reference(&self) -> &[u8] {
        self.msa.first().map(|row| row.as_slice()).unwrap_or(&[])
    }

    /// Number of columns of the reference sequence.
    pub fn len(&self) -> usize {
        self.reference().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_seqs(&self) -> usize {
        self.msa.len()
    }

    pub fn column(&self, i: usize) -> Vec<u8> {
        self.msa.iter().map(|row| row[i]).collect()
    }

    /// Henikoff position-based sequence weights.
    ///
    /// In each column a non-gap row gets `1 / (n_r * k)`, where `n_r` is the
    /// count of its residue and `k` the number of distinct residues. The sums
    /// are divided by the number of columns.
    pub fn sequence_weights(&self) -> Vec<f64> {
        let mut weights = vec![0.0; self.num_seqs()];
        if self.is_empty() {
            return weights;
        }

        for i in 0..self.len() {
            let col: Vec<usize> = self.msa.iter().map(|row| aa_index(row[i])).collect();

            let mut counts = [0usize; 21];
            for &idx in col.iter().filter(|&&idx| idx != GAP_INDEX) {
                counts[idx] += 1;
            }
            let observed = counts.iter().filter(|&&c| c > 0).count();

            for (j, &idx) in col.iter().enumerate() {
                let d = counts[idx] * observed;
                if idx != GAP_INDEX && d > 0 {
                    weights[j] += 1.0 / d as f64;
                }
            }
        }

        let ncols = self.len() as f64;
        weights.iter_mut().for_each(|w| *w /= ncols);

        weights
    }
}
