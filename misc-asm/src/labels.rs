use std::collections::HashMap;

/// Maps a lower-cased label name to its resolved byte address.
pub type LabelMap = HashMap<String, u16>;
