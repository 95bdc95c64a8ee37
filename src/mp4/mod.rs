// MP4/M4A format support
//
// MP4 files are a tree of atoms (boxes): a 4-byte big-endian size that
// includes the 8-byte header, a 4-character type, then the payload.
// iTunes-style metadata lives under moov/udta/meta/ilst:
// - ftyp: File type atom, always first
// - moov: Movie atom (container)
//   - udta: User data atom
//     - meta: Metadata atom (version/flags, then children)
//       - ilst: Information list atom
//         - ©nam, ©ART, aART, ©alb, ©day, trkn: items, each holding a `data` atom
// - mdat: Media data atom (skipped)

pub mod atoms;

use std::path::Path;

use tracing::{debug, trace};

pub use atoms::{Atom, AtomKind, AtomPayload, FourCC};

use crate::error::{TagError, TagResult};
use crate::field_mapping::{Field, ValueConverter};
use crate::options::ReadOptions;
use crate::tag::{FieldCandidates, FieldValue, Tag};
use crate::utils::cursor::{ByteCursor, ViewLength};
use crate::utils::encoding::{decode_text, TextEncoding};
use crate::utils::io::load_file;

const ATOM_HEADER_LEN: u32 = 8;

/// Offset of the track number inside a `trkn` data buffer
const TRACK_NUMBER_OFFSET: usize = 3;

/// Reads iTunes metadata from MP4/M4A files
#[derive(Debug, Clone, Default)]
pub struct Mp4Reader {
    options: ReadOptions,
}

impl Mp4Reader {
    pub fn new(options: ReadOptions) -> Self {
        Mp4Reader { options }
    }

    pub fn read(&self, path: impl AsRef<Path>) -> TagResult<Tag> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading M4A atoms");
        let bytes = load_file(path)?;
        self.read_from_bytes(&bytes)
    }

    pub fn read_from_bytes(&self, data: &[u8]) -> TagResult<Tag> {
        let (_, tag) = self.walk(data)?;
        Ok(tag)
    }

    /// The decoded atom tree, without the atoms that produced nothing
    pub fn parse_atoms(&self, data: &[u8]) -> TagResult<Vec<Atom>> {
        let (atoms, _) = self.walk(data)?;
        Ok(atoms)
    }

    fn walk(&self, data: &[u8]) -> TagResult<(Vec<Atom>, Tag)> {
        let mut file = ByteCursor::new("Whole file", data);
        if file.has_more() {
            let mut first = file.look_ahead("Atom header", ATOM_HEADER_LEN as usize)?;
            first.skip(4)?;
            let name = FourCC(first.read_array()?);
            if name != FourCC::FTYP {
                return Err(TagError::MalformedFile(format!(
                    "first atom expected to be ftyp, found {}",
                    name
                )));
            }
        }

        let mut walker = AtomWalker {
            max_depth: self.options.max_atom_depth,
            candidates: FieldCandidates::new(),
        };
        let atoms = walker.read_children(&mut file, 0)?;
        Ok((atoms, walker.candidates.into_tag()))
    }
}

/// Read the iTunes metadata of a file with default options
pub fn read(path: impl AsRef<Path>) -> TagResult<Tag> {
    Mp4Reader::default().read(path)
}

pub fn read_from_bytes(data: &[u8]) -> TagResult<Tag> {
    Mp4Reader::default().read_from_bytes(data)
}

pub fn parse_atoms(data: &[u8], options: &ReadOptions) -> TagResult<Vec<Atom>> {
    Mp4Reader::new(options.clone()).parse_atoms(data)
}

struct AtomWalker {
    max_depth: usize,
    candidates: FieldCandidates,
}

impl AtomWalker {
    fn read_children(&mut self, parent: &mut ByteCursor<'_>, depth: usize) -> TagResult<Vec<Atom>> {
        if depth > self.max_depth {
            return Err(TagError::MalformedFile(format!(
                "atoms nested deeper than {} levels",
                self.max_depth
            )));
        }

        let mut atoms = Vec::new();
        while parent.has_more() {
            if let Some(atom) = self.read_atom(parent, depth)? {
                atoms.push(atom);
            }
        }
        Ok(atoms)
    }

    fn read_atom(&mut self, parent: &mut ByteCursor<'_>, depth: usize) -> TagResult<Option<Atom>> {
        let (size, name) = read_header(parent)?;
        debug!(size, name = %name, depth, "Found atom header");

        let mut body = parent.sub_view(
            "Atom data",
            ViewLength::Exact((size - ATOM_HEADER_LEN) as usize),
        )?;
        let payload = match AtomKind::classify(name) {
            AtomKind::Container => {
                Some(AtomPayload::Children(self.read_children(&mut body, depth + 1)?))
            }
            AtomKind::Meta => {
                let _version_flags = body.read_u32_be()?;
                Some(AtomPayload::Children(self.read_children(&mut body, depth + 1)?))
            }
            AtomKind::Item(field) => {
                let children = self.read_children(&mut body, depth + 1)?;
                self.extract_item(field, &children)
            }
            AtomKind::Data => read_data(&mut body)?,
            AtomKind::Other => None,
        };
        body.skip_to_end();

        if let Some(payload) = &payload {
            trace!(name = %name, ?payload, "Decoded atom data");
        }
        Ok(payload.map(|payload| Atom { size, name, payload }))
    }

    /// Take the value of the first `data` child and offer it for `field`
    fn extract_item(&mut self, field: Field, children: &[Atom]) -> Option<AtomPayload> {
        let data = children.iter().find(|atom| atom.name == FourCC::DATA)?;

        let value = match (field, &data.payload) {
            (Field::TrackNumber, AtomPayload::Buffer(bytes)) => {
                FieldValue::Number(u32::from(*bytes.get(TRACK_NUMBER_OFFSET)?))
            }
            (Field::TrackNumber, _) => return None,
            (_, AtomPayload::Text(text)) => FieldValue::Text(text.clone()),
            (_, AtomPayload::Buffer(bytes)) => {
                FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            _ => return None,
        };

        let payload = match &value {
            FieldValue::Number(n) => (*n > 0).then_some(AtomPayload::Integer(*n)),
            FieldValue::Text(text) if field == Field::Year => {
                ValueConverter::parse_positive(text).map(AtomPayload::Integer)
            }
            FieldValue::Text(text) => Some(AtomPayload::Text(text.clone())),
        };
        self.candidates.offer(field, value);
        payload
    }
}

fn read_header(parent: &mut ByteCursor<'_>) -> TagResult<(u32, FourCC)> {
    if parent.remaining() < ATOM_HEADER_LEN as usize {
        return Err(TagError::MalformedFile(format!(
            "{} trailing bytes in {} are too short for an atom header",
            parent.remaining(),
            parent.label()
        )));
    }
    let size = parent.read_u32_be()?;
    let name = FourCC(parent.read_array()?);

    if size < ATOM_HEADER_LEN {
        return Err(TagError::MalformedFile(format!(
            "atom {} declares size {}, smaller than its header",
            name, size
        )));
    }
    let body_len = (size - ATOM_HEADER_LEN) as usize;
    if body_len > parent.remaining() {
        return Err(TagError::MalformedFile(format!(
            "atom {} declares {} payload bytes but only {} remain",
            name,
            body_len,
            parent.remaining()
        )));
    }
    Ok((size, name))
}

/// Decode a `data` atom: version (1), flags (3), reserved (4), then the value.
///
/// Flags 0 is an opaque buffer and 1 is UTF-8 text. Empty text and other
/// flags produce nothing.
fn read_data(body: &mut ByteCursor<'_>) -> TagResult<Option<AtomPayload>> {
    let _version = body.read_u8()?;
    let flags = body.read_u24_be()?;
    let _reserved = body.read_u32_be()?;

    let payload = match flags {
        0 => Some(AtomPayload::Buffer(body.read_remaining().to_vec())),
        1 => {
            let text = decode_text(body.read_remaining(), TextEncoding::Utf8);
            (!text.is_empty()).then_some(AtomPayload::Text(text))
        }
        other => {
            trace!(flags = other, "Skipping data atom with unhandled type");
            None
        }
    };
    Ok(payload)
}
