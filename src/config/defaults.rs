//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Decay rate per second of event age for usage ranking
pub const DEFAULT_DECAY: f64 = 1e-4;

/// Default usage lookback window in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Default icon cache capacity (number of icons, not bytes)
pub const DEFAULT_ICON_CACHE_CAPACITY: usize = 256;

/// Edge length of a rendered icon in pixels
pub const DEFAULT_ICON_SIZE_PX: u32 = 96;

/// Number of icon render worker threads
pub const DEFAULT_ICON_WORKERS: usize = 4;

/// Personal/dev prefix is disabled unless configured
pub const DEFAULT_PERSONAL_DEV_PREFIX: &str = "";

/// Package fragments treated as professional or banking apps.
/// Matched as case-insensitive substrings of the package identifier.
pub const DEFAULT_PROFESSIONAL_PACKAGES: &[&str] = &[
    // Banking
    "com.bankofamerica",
    "com.chase",
    "com.wellsfargo",
    "com.usaa",
    "com.capitalone",
    "com.citibank",
    "com.usbank",
    "com.ally",
    "com.discover",
    "com.pnc",
    "com.td",
    "com.suntrust",
    "com.regions",
    "com.fidelity",
    "com.schwab",
    "com.vanguard",
    "com.etrade",
    "com.paypal",
    "com.venmo",
    "com.square.cash",
    "com.coinbase",
    // Professional/Business
    "com.microsoft.office",
    "com.google.android.apps.docs",
    "com.google.android.apps.sheets",
    "com.google.android.apps.slides",
    "com.microsoft.teams",
    "com.slack",
    "com.zoom",
    "com.cisco.webex",
    "com.dropbox",
    "com.box",
    "com.evernote",
    "com.notion",
    "com.trello",
    "com.asana",
    "com.linkedin",
    "com.adobe.reader",
    "com.adobe.scan",
    "com.scanner",
    "com.camscanner",
];

/// Package fragments treated as utilities and tools
pub const DEFAULT_UTILITY_PACKAGES: &[&str] = &[
    "com.android.settings",
    "com.android.calculator2",
    "com.google.android.calculator",
    "com.android.calendar",
    "com.google.android.calendar",
    "com.android.deskclock",
    "com.google.android.deskclock",
    "com.android.contacts",
    "com.google.android.contacts",
    "com.android.dialer",
    "com.google.android.dialer",
    "com.android.camera",
    "com.google.android.camera",
    "com.android.gallery3d",
    "com.google.android.apps.photos",
    "com.android.providers.downloads.ui",
    "com.google.android.apps.messaging",
    "com.android.mms",
    "com.google.android.gm",
    "com.android.email",
    "com.google.android.apps.maps",
    "com.google.android.youtube",
    "com.android.chrome",
    "com.google.android.googlequicksearchbox",
    "com.google.android.apps.translate",
    "com.google.android.keep",
    "com.google.android.apps.recorder",
    "com.android.systemui",
    "com.samsung.android.app.settings",
    "com.samsung.android.calendar",
    "com.samsung.android.contacts",
    "com.samsung.android.dialer",
    "com.samsung.android.messaging",
    "com.samsung.android.email",
    "com.sec.android.app.launcher",
];

/// Extra keywords that mark a package as professional in `is_professional_package`
pub const PROFESSIONAL_KEYWORDS: &[&str] = &["bank", "finance", "trading"];

/// Location of the user config file (tilde-expanded at load time)
pub const DEFAULT_CONFIG_PATH: &str = "~/.launcher-core/config.json";
