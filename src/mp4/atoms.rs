// MP4 atom types

use std::fmt;

use crate::field_mapping::{Field, FieldMappings};

/// A four-character atom type
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const FTYP: FourCC = FourCC(*b"ftyp");
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const UDTA: FourCC = FourCC(*b"udta");
    pub const META: FourCC = FourCC(*b"meta");
    pub const ILST: FourCC = FourCC(*b"ilst");
    pub const DATA: FourCC = FourCC(*b"data");

    /// ASCII lower-casing; bytes such as © (0xA9) are kept as is
    pub fn to_lowercase(self) -> FourCC {
        FourCC(self.0.map(|b| b.to_ascii_lowercase()))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding_rs::mem::decode_latin1(&self.0))
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

/// How an atom's payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// moov, udta, ilst: a list of child atoms
    Container,
    /// 4 bytes of version/flags, then child atoms
    Meta,
    /// An iTunes item whose `data` child holds a field value
    Item(Field),
    /// version, flags, reserved, then the value
    Data,
    /// Skipped without interpretation
    Other,
}

impl AtomKind {
    pub fn classify(name: FourCC) -> AtomKind {
        let name = name.to_lowercase();
        match name {
            FourCC::MOOV | FourCC::UDTA | FourCC::ILST => AtomKind::Container,
            FourCC::META => AtomKind::Meta,
            FourCC::DATA => AtomKind::Data,
            _ => match FieldMappings::from_mp4(name.0) {
                Some(field) => AtomKind::Item(field),
                None => AtomKind::Other,
            },
        }
    }
}

/// A decoded atom. Atoms that produced nothing are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Total size, header included
    pub size: u32,
    pub name: FourCC,
    pub payload: AtomPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomPayload {
    Children(Vec<Atom>),
    Text(String),
    Buffer(Vec<u8>),
    Integer(u32),
}

impl Atom {
    pub fn children(&self) -> &[Atom] {
        match &self.payload {
            AtomPayload::Children(children) => children,
            _ => &[],
        }
    }

    /// First descendant reached by following `path` of atom names
    pub fn find(&self, path: &[FourCC]) -> Option<&Atom> {
        let (first, rest) = path.split_first()?;
        let child = self.children().iter().find(|a| a.name == *first)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.find(rest)
        }
    }
}
