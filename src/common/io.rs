//! Common I/O code using sync I/O.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Returns whether the path looks like a gzip or bgzip file.
pub fn is_gz<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    [Some(Some("gz")), Some(Some("bgz"))].contains(&path.as_ref().extension().map(|s| s.to_str()))
}

/// Transparently open a file with gzip decoder for reading.
///
/// Note that decoding of multi-member gzip files is automatically supported, as is needed for
/// `bgzip` files.
///
/// # Arguments
///
/// * `path` - A path to the file to open.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if is_gz(path.as_ref()) {
        tracing::trace!("Opening {:?} as gzip for reading", path.as_ref());
        let file = File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening {:?}: {}", path.as_ref(), e))?;
        let bufreader = BufReader::new(file);
        let decoder = MultiGzDecoder::new(bufreader);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path.as_ref());
        let file = File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening {:?}: {}", path.as_ref(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Transparently open a file with gzip encoder for writing.
///
/// # Arguments
///
/// * `path` - A path to the file to open.
pub fn open_write_maybe_gz<P>(path: P) -> Result<Box<dyn Write>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for writing", path.as_ref());
        let file = File::create(path)?;
        let bufwriter = BufWriter::new(file);
        let encoder = GzEncoder::new(bufwriter, Compression::default());
        Ok(Box::new(encoder))
    } else {
        tracing::trace!("Opening {:?} as plain text for writing", path.as_ref());
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use pretty_assertions::assert_eq;

    #[rstest::rstest]
    #[case("x.txt", false)]
    #[case("x.txt.gz", true)]
    #[case("x.vcf.bgz", true)]
    #[case("x.gzip", false)]
    fn is_gz(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(super::is_gz(path), expected);
    }

    #[rstest::rstest]
    #[case("test.vcf")]
    #[case("test.vcf.gz")]
    fn open_read_maybe_gz(#[case] path: &str) -> Result<(), anyhow::Error> {
        crate::common::set_snapshot_suffix!("{}", path);

        let mut reader = super::open_read_maybe_gz(format!("tests/data/vcf/{}", path))?;
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;

        insta::assert_snapshot!(buf);

        Ok(())
    }

    #[rstest::rstest]
    #[case("lines.txt")]
    #[case("lines.txt.gz")]
    fn write_then_read(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join(filename);

        {
            let mut writer = super::open_write_maybe_gz(&path)?;
            for i in 1..=3 {
                writer.write_all(format!("line {}\n", i).as_bytes())?;
            }
            writer.flush()?;
        }

        let mut reader = super::open_read_maybe_gz(&path)?;
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        assert_eq!(buf, "line 1\nline 2\nline 3\n");

        Ok(())
    }
}
