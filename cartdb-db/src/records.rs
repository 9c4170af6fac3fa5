//! Cartridge database records, as read from NesCartDB XML and written to SQLite.
//!
//! Attribute values are kept as the text that appears in the source document.

/// A game and everything nested under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub name: String,
    pub altname: Option<String>,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub catalog: Option<String>,
    pub publisher: Option<String>,
    pub developer: Option<String>,
    pub region: Option<String>,
    pub players: Option<String>,
    pub date: Option<String>,
    pub peripherals: Vec<DeviceRecord>,
    pub cartridges: Vec<CartridgeRecord>,
}

/// A peripheral the game supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub device_type: Option<String>,
    pub name: Option<String>,
}

/// One physical cartridge release of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartridgeRecord {
    pub system: Option<String>,
    pub revision: Option<String>,
    pub crc: Option<String>,
    pub sha1: Option<String>,
    pub dump: Option<String>,
    pub dumper: Option<String>,
    pub datedumped: Option<String>,
    pub boards: Vec<BoardRecord>,
}

/// The circuit board inside a cartridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRecord {
    pub board_type: Option<String>,
    pub pcb: Option<String>,
    pub mapper: Option<String>,
    pub prg: Vec<RomRecord>,
    pub chr: Vec<RomRecord>,
    pub vram: Vec<RamRecord>,
    pub wram: Vec<RamRecord>,
    pub chips: Vec<ChipRecord>,
    pub cic: Vec<CicRecord>,
    pub pads: Vec<PadRecord>,
}

/// Which ROM table a [`RomRecord`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomKind {
    Prg,
    Chr,
}

impl RomKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Prg => "prg",
            Self::Chr => "chr",
        }
    }
}

/// A PRG or CHR ROM chip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomRecord {
    pub name: Option<String>,
    pub size: Option<String>,
    pub crc: Option<String>,
    pub sha1: Option<String>,
}

/// A VRAM or WRAM region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RamRecord {
    pub size: Option<String>,
    /// Only meaningful for WRAM.
    pub battery: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipRecord {
    pub chip_type: Option<String>,
    pub pins: Vec<PinRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinRecord {
    pub number: Option<String>,
    pub function: Option<String>,
}

/// Lockout chip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CicRecord {
    pub cic_type: Option<String>,
}

/// Solder pad configuration (mirroring).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PadRecord {
    pub h: Option<String>,
    pub v: Option<String>,
}
