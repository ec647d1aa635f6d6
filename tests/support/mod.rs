//! Builds minimal TrueType fonts and collections in memory.
//!
//! The fonts carry only the tables face parsing and width queries need:
//! `cmap` (format 12), `head`, `hhea`, `hmtx`, `maxp` (v0.5) and `name`.
//! There are no outlines.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const NOTDEF_ADVANCE: u16 = 500;

#[derive(Debug, Clone)]
pub struct TestFont {
    name: Option<String>,
    units_per_em: u16,
    glyphs: BTreeMap<char, u16>,
    cmap: bool,
}

impl TestFont {
    pub fn new(name: &str) -> Self {
        TestFont {
            name: Some(name.to_string()),
            units_per_em: 1000,
            glyphs: BTreeMap::new(),
            cmap: true,
        }
    }

    pub fn unnamed() -> Self {
        TestFont {
            name: None,
            ..TestFont::new("")
        }
    }

    pub fn units_per_em(mut self, units_per_em: u16) -> Self {
        self.units_per_em = units_per_em;
        self
    }

    /// Map every character of `chars` to a glyph with `advance` font units.
    pub fn glyphs(mut self, chars: &str, advance: u16) -> Self {
        for ch in chars.chars() {
            self.glyphs.insert(ch, advance);
        }
        self
    }

    pub fn without_cmap(mut self) -> Self {
        self.cmap = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    pub fn write_to(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        fs::write(&path, self.build()).unwrap();
        path
    }

    /// Serialize as if the font started at byte `base` of the file.
    fn build_at(&self, base: usize) -> Vec<u8> {
        let mut tables: Vec<(&[u8; 4], Vec<u8>)> = Vec::new();
        if self.cmap {
            tables.push((b"cmap", self.cmap_table()));
        }
        tables.push((b"head", self.head_table()));
        tables.push((b"hhea", self.hhea_table()));
        tables.push((b"hmtx", self.hmtx_table()));
        tables.push((b"maxp", self.maxp_table()));
        if self.name.is_some() {
            tables.push((b"name", self.name_table()));
        }

        let num_tables = tables.len() as u16;
        let mut out = Vec::new();
        push_u32(&mut out, 0x0001_0000);
        push_u16(&mut out, num_tables);
        let entry_selector = 15 - num_tables.leading_zeros() as u16;
        let search_range = (1u16 << entry_selector) * 16;
        push_u16(&mut out, search_range);
        push_u16(&mut out, entry_selector);
        push_u16(&mut out, num_tables * 16 - search_range);

        let mut offset = 12 + 16 * tables.len();
        let mut body = Vec::new();
        for (tag, data) in &tables {
            out.extend_from_slice(*tag);
            push_u32(&mut out, 0); // checksum
            push_u32(&mut out, (base + offset) as u32);
            push_u32(&mut out, data.len() as u32);

            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 12 + 16 * tables.len() + body.len();
        }
        out.extend_from_slice(&body);
        out
    }

    fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16 + 1
    }

    fn head_table(&self) -> Vec<u8> {
        let mut t = Vec::new();
        push_u32(&mut t, 0x0001_0000); // version
        push_u32(&mut t, 0x0001_0000); // fontRevision
        push_u32(&mut t, 0); // checksumAdjustment
        push_u32(&mut t, 0x5F0F_3CF5); // magicNumber
        push_u16(&mut t, 0); // flags
        push_u16(&mut t, self.units_per_em);
        t.extend_from_slice(&[0; 16]); // created, modified
        t.extend_from_slice(&[0; 8]); // xMin, yMin, xMax, yMax
        push_u16(&mut t, 0); // macStyle
        push_u16(&mut t, 8); // lowestRecPPEM
        push_u16(&mut t, 2); // fontDirectionHint
        push_u16(&mut t, 0); // indexToLocFormat
        push_u16(&mut t, 0); // glyphDataFormat
        assert_eq!(t.len(), 54);
        t
    }

    fn hhea_table(&self) -> Vec<u8> {
        let max_advance = self
            .glyphs
            .values()
            .copied()
            .chain([NOTDEF_ADVANCE])
            .max()
            .unwrap_or(NOTDEF_ADVANCE);
        let mut t = Vec::new();
        push_u32(&mut t, 0x0001_0000);
        push_u16(&mut t, 800); // ascender
        push_u16(&mut t, (-200i16) as u16); // descender
        push_u16(&mut t, 0); // lineGap
        push_u16(&mut t, max_advance);
        t.extend_from_slice(&[0; 6]); // minLSB, minRSB, xMaxExtent
        push_u16(&mut t, 1); // caretSlopeRise
        t.extend_from_slice(&[0; 4]); // caretSlopeRun, caretOffset
        t.extend_from_slice(&[0; 8]); // reserved
        push_u16(&mut t, 0); // metricDataFormat
        push_u16(&mut t, self.num_glyphs());
        assert_eq!(t.len(), 36);
        t
    }

    fn hmtx_table(&self) -> Vec<u8> {
        let mut t = Vec::new();
        push_u16(&mut t, NOTDEF_ADVANCE);
        push_u16(&mut t, 0);
        for advance in self.glyphs.values() {
            push_u16(&mut t, *advance);
            push_u16(&mut t, 0);
        }
        t
    }

    fn maxp_table(&self) -> Vec<u8> {
        let mut t = Vec::new();
        push_u32(&mut t, 0x0000_5000);
        push_u16(&mut t, self.num_glyphs());
        t
    }

    fn cmap_table(&self) -> Vec<u8> {
        let mut t = Vec::new();
        push_u16(&mut t, 0); // version
        push_u16(&mut t, 1); // numTables
        push_u16(&mut t, 0); // platform: Unicode
        push_u16(&mut t, 4); // encoding: full repertoire
        push_u32(&mut t, 12); // subtable offset

        let groups = self.glyphs.len() as u32;
        push_u16(&mut t, 12); // format
        push_u16(&mut t, 0); // reserved
        push_u32(&mut t, 16 + 12 * groups); // length
        push_u32(&mut t, 0); // language
        push_u32(&mut t, groups);
        for (glyph_id, ch) in self.glyphs.keys().enumerate() {
            push_u32(&mut t, *ch as u32);
            push_u32(&mut t, *ch as u32);
            push_u32(&mut t, glyph_id as u32 + 1);
        }
        t
    }

    fn name_table(&self) -> Vec<u8> {
        let name = self.name.as_deref().unwrap_or_default();
        let encoded: Vec<u8> = name.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();

        let mut t = Vec::new();
        let records: [u16; 2] = [1, 6]; // family, PostScript name
        push_u16(&mut t, 0); // format
        push_u16(&mut t, records.len() as u16);
        push_u16(&mut t, 6 + 12 * records.len() as u16); // storage offset
        for name_id in records {
            push_u16(&mut t, 3); // platform: Windows
            push_u16(&mut t, 1); // encoding: Unicode BMP
            push_u16(&mut t, 0x0409); // language: en-US
            push_u16(&mut t, name_id);
            push_u16(&mut t, encoded.len() as u16);
            push_u16(&mut t, 0); // both records share the string
        }
        t.extend_from_slice(&encoded);
        t
    }
}

/// A `.ttc` holding `fonts` in order.
pub fn collection(fonts: &[TestFont]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    push_u32(&mut out, 0x0001_0000);
    push_u32(&mut out, fonts.len() as u32);

    let header_len = 12 + 4 * fonts.len();
    let mut body = Vec::new();
    for font in fonts {
        push_u32(&mut out, (header_len + body.len()) as u32);
        body.extend(font.build_at(header_len + body.len()));
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    out.extend(body);
    out
}

pub fn write_collection(dir: &Path, file_name: &str, fonts: &[TestFont]) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, collection(fonts)).unwrap();
    path
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
