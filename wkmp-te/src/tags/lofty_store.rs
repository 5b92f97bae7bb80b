//! Tag I/O using lofty
//!
//! Standard fields go through a fixed [`ItemKey`] table so they land in the
//! right frame/atom/comment for every container. Other keys lofty knows are
//! named by their Vorbis comment name (`LYRICIST`, `REPLAYGAIN_TRACK_GAIN`)
//! so a field reads the same across formats; keys lofty does not know keep
//! their raw name, upper-cased.

use super::{diff, ensure_standard_fields, FieldAction, TagStore};
use crate::engine::FieldMapping;
use crate::error::{Error, Result};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
use std::path::Path;
use tracing::debug;

/// Standard field name ↔ lofty item key
const STANDARD_KEYS: [(&str, ItemKey); 13] = [
    ("ARTIST", ItemKey::TrackArtist),
    ("TITLE", ItemKey::TrackTitle),
    ("ALBUM", ItemKey::AlbumTitle),
    ("GENRE", ItemKey::Genre),
    ("COMPOSER", ItemKey::Composer),
    ("PERFORMER", ItemKey::Performer),
    ("ALBUMARTIST", ItemKey::AlbumArtist),
    ("DATE", ItemKey::RecordingDate),
    ("TRACKNUMBER", ItemKey::TrackNumber),
    ("TRACKTOTAL", ItemKey::TrackTotal),
    ("DISCNUMBER", ItemKey::DiscNumber),
    ("TOTALDISCS", ItemKey::DiscTotal),
    ("COMMENT", ItemKey::Comment),
];

/// Field name for an item key read from a `tag_type` tag
fn field_name(key: &ItemKey, tag_type: TagType) -> String {
    if let Some((name, _)) = STANDARD_KEYS.iter().find(|(_, k)| k == key) {
        return name.to_string();
    }
    key.map_key(TagType::VorbisComments, false)
        .or_else(|| key.map_key(tag_type, true))
        .map(str::to_uppercase)
        .unwrap_or_else(|| format!("{:?}", key).to_uppercase())
}

/// Item key for a field name, inverse of [`field_name`]
fn item_key(field: &str, tag_type: TagType) -> ItemKey {
    if let Some((_, key)) = STANDARD_KEYS.iter().find(|(name, _)| *name == field) {
        return key.clone();
    }
    match ItemKey::from_key(TagType::VorbisComments, field) {
        ItemKey::Unknown(_) => ItemKey::from_key(tag_type, field),
        key => key,
    }
}

/// Key of the item `field` was read from, or a fresh key for a new field
///
/// Raw keys are matched against the tag's own items first so an edit
/// replaces the existing item instead of adding a differently-cased one.
fn resolve_key(tag: &Tag, field: &str) -> ItemKey {
    let tag_type = tag.tag_type();
    tag.items()
        .map(|item| item.key())
        .find(|key| field_name(key, tag_type) == field)
        .cloned()
        .unwrap_or_else(|| item_key(field, tag_type))
}

/// Formats whose keys are free-form text
fn accepts_custom_keys(tag_type: TagType) -> bool {
    matches!(tag_type, TagType::VorbisComments | TagType::Ape)
}

/// Set `key` to `value`, replacing existing items; false if the format has no slot for it
fn set_text(tag: &mut Tag, key: ItemKey, value: &str) -> bool {
    if let ItemKey::Unknown(_) = key {
        if !accepts_custom_keys(tag.tag_type()) {
            return false;
        }
        tag.insert_unchecked(TagItem::new(key, ItemValue::Text(value.to_string())));
        return true;
    }
    tag.insert_text(key, value.to_string())
}

/// [`TagStore`] backed by lofty
#[derive(Debug, Clone, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    pub fn new() -> Self {
        Self
    }
}

impl TagStore for LoftyTagStore {
    fn read_tags(&self, path: &Path) -> Result<FieldMapping> {
        let tagged_file = Probe::open(path)
            .map_err(|e| Error::tag(path, e))?
            .read()
            .map_err(|e| Error::tag(path, e))?;

        let mut tags = FieldMapping::new();

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            for item in tag.items() {
                let Some(text) = item.value().text() else {
                    continue;
                };
                // Multi-valued fields: first value wins
                tags.entry(field_name(item.key(), tag.tag_type()))
                    .or_insert_with(|| text.to_string());
            }
        } else {
            debug!("No tags in {}", path.display());
        }

        Ok(ensure_standard_fields(tags))
    }

    /// Fields the tag format cannot hold are skipped; the remaining changes
    /// are still saved and the skipped names are reported as an error.
    fn write_tags(&self, path: &Path, original: &FieldMapping, new: &FieldMapping) -> Result<()> {
        let changes = diff(original, new);
        if changes.is_empty() {
            return Ok(());
        }

        let mut tagged_file = Probe::open(path)
            .map_err(|e| Error::tag(path, e))?
            .read()
            .map_err(|e| Error::tag(path, e))?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .primary_tag_mut()
            .ok_or_else(|| Error::tag(path, "file format cannot hold a tag"))?;
        let tag_type = tag.tag_type();

        let mut rejected = Vec::new();
        for change in &changes {
            let key = resolve_key(tag, &change.field);
            match change.action() {
                FieldAction::Write(value) => {
                    if !set_text(tag, key, value) {
                        rejected.push(change.field.as_str());
                    }
                }
                FieldAction::Delete => tag.remove_key(&key),
            }
        }

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::tag(path, e))?;

        debug!("Wrote {} field changes to {}", changes.len() - rejected.len(), path.display());

        if !rejected.is_empty() {
            return Err(Error::tag(
                path,
                format!("{:?} tags cannot hold {}", tag_type, rejected.join(", ")),
            ));
        }
        Ok(())
    }
}
