use std::collections::HashMap;

/// Fallback box colours, cycled by class id.
pub const DEFAULT_COLOURS: [u32; 10] = [
    0xFFFF6B6B, // red
    0xFF4ECDC4, // teal
    0xFF45B7D1, // blue
    0xFFFFA07A, // light salmon
    0xFF98D8C8, // mint
    0xFFF7DC6F, // yellow
    0xFFBB8FCE, // purple
    0xFF85C1E2, // sky blue
    0xFFF8B88B, // peach
    0xFFAED581, // light green
];

/// Segmentation mask colours, cycled by class id.
pub const MASK_COLOURS: [u32; 20] = [
    0xFFFF3838, 0xFFFF9D97, 0xFFFF701F, 0xFFFFB21D, 0xFFCFD231,
    0xFF48F90A, 0xFF92CC17, 0xFF3DDB86, 0xFF1A9334, 0xFF00D4BB,
    0xFF2C99A8, 0xFF00C2FF, 0xFF344593, 0xFF6473FF, 0xFF0018EC,
    0xFF8438FF, 0xFF520085, 0xFFCB38FF, 0xFFFF95C8, 0xFFFF37C7,
];

/// Label to ARGB colour lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassPalette {
    colours: HashMap<String, u32>,
}

impl ClassPalette {
    pub fn new(colours: &HashMap<String, u32>) -> Self {
        Self {
            colours: colours.clone(),
        }
    }

    /// Configured colour for the lowercase label, then for the label as written,
    /// then the default palette entry for `class_id`.
    pub fn colour_for(&self, class_id: usize, label: &str) -> u32 {
        self.colours
            .get(&label.to_lowercase())
            .or_else(|| self.colours.get(label))
            .copied()
            .unwrap_or(DEFAULT_COLOURS[class_id % DEFAULT_COLOURS.len()])
    }

    pub fn mask_colour(class_id: usize) -> u32 {
        MASK_COLOURS[class_id % MASK_COLOURS.len()]
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

/// Parses `#RRGGBB` or `#AARRGGBB` into ARGB.
pub fn parse_hex_colour(hex: &str) -> Option<u32> {
    let digits = hex.trim().trim_start_matches('#');
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}
