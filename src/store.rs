//! Saving palettes in a key/value string store and exporting them.
//!
//! Palettes are kept under [`STORAGE_KEY`] as a JSON array of
//! dash-separated hex strings (see [`Palette::to_hex_string`]).

use std::{collections::HashMap, fs, io::{self, Write}, path::{Path, PathBuf}};
use log::warn;
use crate::{error::PaletteError, Palette, RGBColor};

/// The key under which palettes are stored.
pub const STORAGE_KEY: &str = "swatchbook.palettes";

/// File name used by [`export_stored_palettes_to_file`].
pub const EXPORT_FILE_NAME: &str = "palettes-exported.js";

/// A persistent map from keys to strings (e.g. browser local storage).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// An in-memory [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> { self.0.get(key).cloned() }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) { self.0.remove(key); }
}

/// Append `palette` to the stored palettes.  Empty palettes are not
/// stored.
pub fn store_palette<Color: RGBColor>(
    store: &mut impl KeyValueStore, palette: &Palette<Color>
) -> Result<(), PaletteError> {
    if palette.is_empty() { return Ok(()) }
    let mut hex = load_stored_hex_strings(store)?.unwrap_or_default();
    hex.push(palette.to_hex_string());
    store.set(STORAGE_KEY, serde_json::to_string(&hex)?);
    Ok(())
}

/// The stored hex strings, `None` if nothing was stored.
pub fn load_stored_hex_strings(
    store: &impl KeyValueStore
) -> Result<Option<Vec<String>>, PaletteError> {
    match store.get(STORAGE_KEY) {
        None => Ok(None),
        Some(item) if item.is_empty() => Ok(None),
        Some(item) => serde_json::from_str(&item).map(Some).map_err(|e| {
            warn!("stored palettes under {STORAGE_KEY:?} are corrupted: {e}");
            PaletteError::from(e)
        }),
    }
}

/// Build one palette per dash-separated hex string.
pub fn load_palettes<Color, S>(hex: &[S]) -> Result<Vec<Palette<Color>>, PaletteError>
where Color: RGBColor, S: AsRef<str> {
    hex.iter().map(|s| s.as_ref().parse()).collect()
}

/// The stored palettes, `None` if nothing was stored.
pub fn load_stored_palettes<Color: RGBColor>(
    store: &impl KeyValueStore
) -> Result<Option<Vec<Palette<Color>>>, PaletteError> {
    load_stored_hex_strings(store)?
        .map(|hex| load_palettes(&hex))
        .transpose()
}

/// Forget all stored palettes.
pub fn clear_stored_palettes(store: &mut impl KeyValueStore) {
    store.remove(STORAGE_KEY)
}

/// Write the stored palettes as a JavaScript array literal,
/// `const hexPalettes = ['…','…'];`.  Nothing is written if no palette
/// is stored.  Returns whether something was written.
pub fn export_stored_palettes(
    store: &impl KeyValueStore, w: &mut impl Write
) -> Result<bool, PaletteError> {
    let hex = match load_stored_hex_strings(store)? {
        Some(hex) if !hex.is_empty() => hex,
        _ => return Ok(false),
    };
    let items: Vec<_> = hex.iter().map(|h| format!("'{h}'")).collect();
    writeln!(w, "const hexPalettes = [{}];", items.join(","))
        .map_err(io_error)?;
    Ok(true)
}

/// [`export_stored_palettes`] into `dir/palettes-exported.js`.  Returns
/// the path of the file, `None` if no palette is stored.
pub fn export_stored_palettes_to_file(
    store: &impl KeyValueStore, dir: impl AsRef<Path>
) -> Result<Option<PathBuf>, PaletteError> {
    let mut contents = Vec::new();
    if !export_stored_palettes(store, &mut contents)? { return Ok(None) }
    let path = dir.as_ref().join(EXPORT_FILE_NAME);
    fs::write(&path, contents).map_err(io_error)?;
    Ok(Some(path))
}

fn io_error(e: io::Error) -> PaletteError { PaletteError::Storage(e.to_string()) }

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    fn pal(s: &str) -> Palette<RGB8> { s.parse().unwrap() }

    #[test]
    fn store_and_load() {
        let mut store = MemoryStore::new();
        assert_eq!(load_stored_palettes::<RGB8>(&store), Ok(None));
        store_palette(&mut store, &pal("aa1100-00bb22")).unwrap();
        store_palette(&mut store, &Palette::<RGB8>::new()).unwrap();
        store_palette(&mut store, &pal("ffffff")).unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap(), r#"["aa1100-00bb22","ffffff"]"#);
        let loaded = load_stored_palettes::<RGB8>(&store).unwrap().unwrap();
        assert_eq!(loaded, vec![pal("aa1100-00bb22"), pal("ffffff")]);
        clear_stored_palettes(&mut store);
        assert_eq!(load_stored_hex_strings(&store), Ok(None));
    }

    #[test]
    fn corrupted_store() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json".to_string());
        assert!(matches!(load_stored_palettes::<RGB8>(&store),
                         Err(PaletteError::Storage(_))));
        store.set(STORAGE_KEY, r#"["aa11zz"]"#.to_string());
        assert!(matches!(load_stored_palettes::<RGB8>(&store),
                         Err(PaletteError::InvalidColor(_))));
    }

    #[test]
    fn export() {
        let mut store = MemoryStore::new();
        let mut out = Vec::new();
        assert_eq!(export_stored_palettes(&store, &mut out), Ok(false));
        assert!(out.is_empty());
        store_palette(&mut store, &pal("aa1100-00bb22")).unwrap();
        store_palette(&mut store, &pal("000000")).unwrap();
        assert_eq!(export_stored_palettes(&store, &mut out), Ok(true));
        assert_eq!(String::from_utf8(out).unwrap(),
                   "const hexPalettes = ['aa1100-00bb22','000000'];\n");
    }

    #[test]
    fn export_to_file() {
        let mut store = MemoryStore::new();
        let dir = std::env::temp_dir()
            .join(format!("swatchbook-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(export_stored_palettes_to_file(&store, &dir), Ok(None));
        store_palette(&mut store, &pal("123456")).unwrap();
        let path = export_stored_palettes_to_file(&store, &dir).unwrap().unwrap();
        let s = fs::read_to_string(&path).unwrap();
        assert_eq!(s, "const hexPalettes = ['123456'];\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
