//! The command catalog: help text and the machine-readable capability list.
//!
//! The catalog is metadata only. Parsing consults it for argument
//! signatures in usage errors; no numeric code reads it.

use std::fmt::Write as _;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Serialize;

/// Program name reported in the capability document.
pub const PROGRAM_NAME: &str = "Maxine Tensor Editor";

/// One catalog row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HelpEntry {
    /// Canonical verb.
    pub command: &'static str,
    /// Argument signature, e.g. `"l r c"`. Empty for no arguments.
    pub args: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// A complete example line.
    pub example: &'static str,
    /// Alternative spellings of the verb.
    pub aliases: &'static [&'static str],
}

const ENTRIES: &[HelpEntry] = &[
    // File operations
    HelpEntry {
        command: "new",
        args: "d h w",
        description: "Creates a new empty tensor (resizes memory).",
        example: ":new 3 64 64",
        aliases: &["resize"],
    },
    HelpEntry {
        command: "open",
        args: "file d h w",
        description: "Resizes memory AND loads a binary file.",
        example: ":open dump.bin 1 128 128",
        aliases: &[],
    },
    HelpEntry {
        command: "load",
        args: "file",
        description: "Loads binary into CURRENT shape (no resize).",
        example: ":load weights.bin",
        aliases: &[],
    },
    HelpEntry {
        command: "save",
        args: "[file]",
        description: "Writes the whole tensor as a raw binary dump.",
        example: ":save weights_fixed.bin",
        aliases: &[],
    },
    HelpEntry {
        command: "export",
        args: "[file]",
        description: "Saves current layer to CSV format.",
        example: ":export layer_1.csv",
        aliases: &[],
    },
    HelpEntry {
        command: "import",
        args: "file",
        description: "Overwrites current layer from CSV file.",
        example: ":import layer_1.csv",
        aliases: &[],
    },
    // Navigation and diagnostics
    HelpEntry {
        command: "goto",
        args: "l r c",
        description: "Teleports cursor/camera to coordinates.",
        example: ":goto 0 500 120",
        aliases: &["jump", "g"],
    },
    HelpEntry {
        command: "health",
        args: "",
        description: "Scans layer for NaNs, Infs, and Dead neurons.",
        example: ":health",
        aliases: &["scan"],
    },
    HelpEntry {
        command: "hist",
        args: "",
        description: "Plots ASCII histogram of value distribution.",
        example: ":hist",
        aliases: &[],
    },
    HelpEntry {
        command: "stats",
        args: "",
        description: "Shows Min, Max, and Mean of current layer.",
        example: ":stats",
        aliases: &[],
    },
    HelpEntry {
        command: "diff",
        args: "file",
        description: "Loads a comparison file (Ghost) for diffing.",
        example: ":diff checkpoint.bin",
        aliases: &[],
    },
    // Math and editing
    HelpEntry {
        command: "clip",
        args: "min max",
        description: "Clamps all values to a specific range.",
        example: ":clip -1.0 1.0",
        aliases: &[],
    },
    HelpEntry {
        command: "norm",
        args: "",
        description: "Normalizes the whole tensor to 0.0 - 1.0 range.",
        example: ":norm",
        aliases: &[],
    },
    HelpEntry {
        command: "zero",
        args: "",
        description: "Sets all values in current layer to 0.0.",
        example: ":zero",
        aliases: &[],
    },
    HelpEntry {
        command: "fill",
        args: "val",
        description: "Sets all values in current layer to 'val'.",
        example: ":fill 3.14",
        aliases: &[],
    },
    HelpEntry {
        command: "relu",
        args: "",
        description: "Applies ReLU activation (max(0, x)).",
        example: ":relu",
        aliases: &[],
    },
    HelpEntry {
        command: "sigmoid",
        args: "",
        description: "Applies Sigmoid activation (1 / 1+e^-x).",
        example: ":sigmoid",
        aliases: &[],
    },
    // Meta
    HelpEntry {
        command: "help",
        args: "[cmd]",
        description: "Shows this list or details for a command.",
        example: ":help goto",
        aliases: &["?"],
    },
    HelpEntry {
        command: "agent_capabilities",
        args: "",
        description: "Dumps capabilities as JSON (Machine Readable).",
        example: ":agent_capabilities",
        aliases: &["agent"],
    },
];

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

/// The built-in catalog.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Ordered command catalog with alias resolution.
#[derive(Debug)]
pub struct Catalog {
    entries: IndexMap<&'static str, HelpEntry>,
    aliases: IndexMap<&'static str, &'static str>,
}

impl Catalog {
    /// Build the catalog of every command the editor understands.
    pub fn builtin() -> Self {
        let mut entries = IndexMap::with_capacity(ENTRIES.len());
        let mut aliases = IndexMap::new();
        for entry in ENTRIES {
            entries.insert(entry.command, *entry);
            for alias in entry.aliases {
                aliases.insert(*alias, entry.command);
            }
        }
        Self { entries, aliases }
    }

    /// Canonical verb for `name`, resolving aliases.
    pub fn canonical(&self, name: &str) -> Option<&'static str> {
        if let Some((key, _)) = self.entries.get_key_value(name) {
            return Some(*key);
        }
        self.aliases.get(name).copied()
    }

    /// Entry for `name` or one of its aliases.
    pub fn lookup(&self, name: &str) -> Option<&HelpEntry> {
        self.canonical(name).and_then(|c| self.entries.get(c))
    }

    /// Entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &HelpEntry> {
        self.entries.values()
    }

    /// Number of canonical commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no commands.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable table of every command.
    pub fn overview(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, " MAXINE HELP SYSTEM \n");
        let _ = writeln!(out, "{:<20}{:<15}DESCRIPTION", "COMMAND", "ARGS");
        let _ = writeln!(out, "{}", "-".repeat(72));
        for e in self.entries() {
            let _ = writeln!(out, "{:<20}{:<15}{}", e.command, e.args, e.description);
        }
        let _ = writeln!(out, "\nType ':help [command]' for examples.");
        out
    }

    /// Detail text for one command, or `None` if `topic` is unknown.
    pub fn detail(&self, topic: &str) -> Option<String> {
        let e = self.lookup(topic)?;
        let mut out = String::new();
        let _ = writeln!(out, "HELP: :{}", e.command);
        let _ = writeln!(out, "  Usage:   :{} {}", e.command, e.args);
        let _ = writeln!(out, "  Effect:  {}", e.description);
        let _ = writeln!(out, "  Example: {}", e.example);
        if !e.aliases.is_empty() {
            let _ = writeln!(out, "  Aliases: {}", e.aliases.join(", "));
        }
        Some(out)
    }

    /// The capability document for non-interactive callers.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            program: PROGRAM_NAME,
            version: env!("CARGO_PKG_VERSION"),
            capabilities: self
                .entries()
                .map(|e| Capability {
                    command: e.command,
                    args: e.args,
                    description: e.description,
                    example: e.example,
                })
                .collect(),
        }
    }
}

/// Machine-readable list of every command.
#[derive(Clone, Debug, Serialize)]
pub struct Capabilities {
    /// Program name.
    pub program: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// One record per command, in catalog order.
    pub capabilities: Vec<Capability>,
}

/// One command in the capability document.
#[derive(Clone, Debug, Serialize)]
pub struct Capability {
    /// Canonical verb.
    pub command: &'static str,
    /// Argument signature.
    pub args: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// A complete example line.
    pub example: &'static str,
}

impl Capabilities {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
