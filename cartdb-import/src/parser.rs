//! NesCartDB XML reader.
//!
//! The document nests `game → cartridge → board → {prg, chr, vram, wram,
//! chip → pin, cic, pad}` with `game → peripherals → device` alongside.
//! Every value lives in an attribute; element text is ignored.

use std::io::BufRead;
use std::path::Path;

use cartdb_db::{
    BoardRecord, CartridgeRecord, ChipRecord, CicRecord, DeviceRecord, GameRecord, PadRecord,
    PinRecord, RamRecord, RomRecord,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ImportError;

/// A parsed NesCartDB document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartDb {
    pub games: Vec<GameRecord>,
}

impl CartDb {
    pub fn cartridge_count(&self) -> usize {
        self.games.iter().map(|g| g.cartridges.len()).sum()
    }
}

/// Parse a NesCartDB XML document.
pub fn parse_cartdb<R: BufRead>(reader: R) -> Result<CartDb, ImportError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut state = ParseState::default();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => state.open(e)?,
            Event::Empty(ref e) => {
                state.open(e)?;
                state.close(e.name().as_ref())?;
            }
            Event::End(ref e) => state.close(e.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    state.finish()
}

/// Parse a NesCartDB XML file from a path.
pub fn parse_cartdb_file(path: &Path) -> Result<CartDb, ImportError> {
    let file = std::fs::File::open(path)?;
    parse_cartdb(std::io::BufReader::new(file))
}

// ── Element state ───────────────────────────────────────────────────────────

#[derive(Default)]
struct ParseState {
    db: CartDb,
    saw_root: bool,
    game: Option<GameRecord>,
    cartridge: Option<CartridgeRecord>,
    board: Option<BoardRecord>,
    chip: Option<ChipRecord>,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), ImportError> {
        let attrs = Attributes::read(e)?;
        match e.name().as_ref() {
            b"database" => self.saw_root = true,
            b"game" => {
                if self.game.is_some() {
                    return Err(ImportError::invalid("<game> nested inside another <game>"));
                }
                let name = attrs
                    .get("name")
                    .ok_or_else(|| ImportError::invalid("<game> without a name attribute"))?;
                self.game = Some(GameRecord {
                    name,
                    altname: attrs.get("altname"),
                    class: attrs.get("class"),
                    subclass: attrs.get("subclass"),
                    catalog: attrs.get("catalog"),
                    publisher: attrs.get("publisher"),
                    developer: attrs.get("developer"),
                    region: attrs.get("region"),
                    players: attrs.get("players"),
                    date: attrs.get("date"),
                    ..Default::default()
                });
            }
            b"peripherals" => {
                self.game_mut("peripherals")?;
            }
            b"device" => self.game_mut("device")?.peripherals.push(DeviceRecord {
                device_type: attrs.get("type"),
                name: attrs.get("name"),
            }),
            b"cartridge" => {
                self.game_mut("cartridge")?;
                self.cartridge = Some(CartridgeRecord {
                    system: attrs.get("system"),
                    revision: attrs.get("revision"),
                    crc: attrs.get("crc"),
                    sha1: attrs.get("sha1"),
                    dump: attrs.get("dump"),
                    dumper: attrs.get("dumper"),
                    datedumped: attrs.get("datedumped"),
                    boards: Vec::new(),
                });
            }
            b"board" => {
                if self.cartridge.is_none() {
                    return Err(ImportError::invalid("<board> outside of <cartridge>"));
                }
                self.board = Some(BoardRecord {
                    board_type: attrs.get("type"),
                    pcb: attrs.get("pcb"),
                    mapper: attrs.get("mapper"),
                    ..Default::default()
                });
            }
            b"prg" => self.board_mut("prg")?.prg.push(attrs.rom()),
            b"chr" => self.board_mut("chr")?.chr.push(attrs.rom()),
            b"vram" => self.board_mut("vram")?.vram.push(RamRecord {
                size: attrs.get("size"),
                battery: false,
            }),
            b"wram" => self.board_mut("wram")?.wram.push(RamRecord {
                size: attrs.get("size"),
                battery: attrs.get("battery").is_some_and(|v| is_truthy(&v)),
            }),
            b"chip" => {
                self.board_mut("chip")?;
                self.chip = Some(ChipRecord {
                    chip_type: attrs.get("type"),
                    pins: Vec::new(),
                });
            }
            b"pin" => {
                let chip = self
                    .chip
                    .as_mut()
                    .ok_or_else(|| ImportError::invalid("<pin> outside of <chip>"))?;
                chip.pins.push(PinRecord {
                    number: attrs.get("number"),
                    function: attrs.get("function"),
                });
            }
            b"cic" => self.board_mut("cic")?.cic.push(CicRecord {
                cic_type: attrs.get("type"),
            }),
            b"pad" => self.board_mut("pad")?.pads.push(PadRecord {
                h: attrs.get("h"),
                v: attrs.get("v"),
            }),
            other => log::trace!("Ignoring <{}>", String::from_utf8_lossy(other)),
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<(), ImportError> {
        match name {
            b"chip" => {
                if let Some(chip) = self.chip.take() {
                    self.board_mut("chip")?.chips.push(chip);
                }
            }
            b"board" => {
                if let Some(board) = self.board.take() {
                    self.cartridge
                        .as_mut()
                        .ok_or_else(|| ImportError::invalid("<board> outside of <cartridge>"))?
                        .boards
                        .push(board);
                }
            }
            b"cartridge" => {
                if let Some(cartridge) = self.cartridge.take() {
                    self.game_mut("cartridge")?.cartridges.push(cartridge);
                }
            }
            b"game" => {
                if let Some(game) = self.game.take() {
                    self.db.games.push(game);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<CartDb, ImportError> {
        if !self.saw_root {
            return Err(ImportError::invalid("No <database> element found"));
        }
        if let Some(game) = self.game {
            return Err(ImportError::invalid(format!(
                "Unterminated <game> element: {}",
                game.name
            )));
        }
        log::debug!("Parsed {} games from cartridge database", self.db.games.len());
        Ok(self.db)
    }

    fn game_mut(&mut self, tag: &str) -> Result<&mut GameRecord, ImportError> {
        self.game
            .as_mut()
            .ok_or_else(|| ImportError::invalid(format!("<{tag}> outside of <game>")))
    }

    fn board_mut(&mut self, tag: &str) -> Result<&mut BoardRecord, ImportError> {
        self.board
            .as_mut()
            .ok_or_else(|| ImportError::invalid(format!("<{tag}> outside of <board>")))
    }
}

// ── Attributes ──────────────────────────────────────────────────────────────

/// Unescaped attribute values of one element.
struct Attributes(Vec<(Vec<u8>, String)>);

impl Attributes {
    fn read(e: &BytesStart<'_>) -> Result<Self, ImportError> {
        let mut values = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            values.push((attr.key.as_ref().to_vec(), value));
        }
        Ok(Self(values))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.clone())
    }

    fn rom(&self) -> RomRecord {
        RomRecord {
            name: self.get("name"),
            size: self.get("size"),
            crc: self.get("crc"),
            sha1: self.get("sha1"),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
