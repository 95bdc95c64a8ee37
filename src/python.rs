// Python bindings, built with the `python` feature

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::{AudioFile, TagError};

fn to_py_err(e: TagError) -> PyErr {
    match e {
        TagError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Decoded tag
#[pyclass(name = "Tag")]
#[derive(Clone)]
pub struct PyTag {
    #[pyo3(get)]
    pub title: String,
    #[pyo3(get)]
    pub artist: String,
    #[pyo3(get)]
    pub album: String,
    #[pyo3(get)]
    pub year: Option<u32>,
    #[pyo3(get)]
    pub track_number: Option<u32>,
}

impl From<crate::Tag> for PyTag {
    fn from(tag: crate::Tag) -> Self {
        PyTag {
            title: tag.title().to_string(),
            artist: tag.artist().to_string(),
            album: tag.album().to_string(),
            year: tag.year,
            track_number: tag.track_number,
        }
    }
}

#[pymethods]
impl PyTag {
    /// Convert to dictionary
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("title", &self.title)?;
        dict.set_item("artist", &self.artist)?;
        dict.set_item("album", &self.album)?;
        dict.set_item("year", self.year)?;
        dict.set_item("track_number", self.track_number)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Tag(title={:?}, artist={:?}, album={:?}, year={:?}, track_number={:?})",
            self.title, self.artist, self.album, self.year, self.track_number
        )
    }
}

/// Read the ID3v2 tag of an MP3 file; None when the file has none
#[pyfunction]
fn read_id3(path: &str) -> PyResult<Option<PyTag>> {
    crate::id3::read(path)
        .map(|tag| tag.map(PyTag::from))
        .map_err(to_py_err)
}

/// Read the iTunes metadata of an MP4/M4A file
#[pyfunction]
fn read_mp4(path: &str) -> PyResult<PyTag> {
    crate::mp4::read(path).map(PyTag::from).map_err(to_py_err)
}

/// Detect the format and read the tag
#[pyfunction]
fn read(path: &str) -> PyResult<Option<PyTag>> {
    let audio = AudioFile::new(path).map_err(to_py_err)?;
    audio
        .read_tag()
        .map(|tag| tag.map(PyTag::from))
        .map_err(to_py_err)
}

#[pymodule]
fn tagscope(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTag>()?;
    m.add_function(wrap_pyfunction!(read_id3, m)?)?;
    m.add_function(wrap_pyfunction!(read_mp4, m)?)?;
    m.add_function(wrap_pyfunction!(read, m)?)?;
    Ok(())
}
