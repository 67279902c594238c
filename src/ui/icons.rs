//! Shared UI icons and emojis.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static LOCK: Emoji<'_, '_> = Emoji("🔒 ", "[AUTH]");

// Project indicators
pub static IMAGE: Emoji<'_, '_> = Emoji("🖼️  ", "[IMG]");
pub static VIDEO: Emoji<'_, '_> = Emoji("🎬 ", "[VID]");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "->");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "-");
pub static MOVE: Emoji<'_, '_> = Emoji("🔀 ", "[MOVE]");
