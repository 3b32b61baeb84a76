//! SAC header schema: field names, null sentinels and enumerated values.
//!
//! The three header arrays are positional. [`FLOAT_HEADERS`],
//! [`INT_HEADERS`] and [`STRING_HEADERS`] give the field name at each
//! position; everything else in the crate addresses fields through them.

/// Number of float header fields.
pub const NFLOAT: usize = 70;
/// Number of integer header fields.
pub const NINT: usize = 40;
/// Number of 8-byte string header slots.
pub const NSTRING: usize = 24;
/// Width of one string header slot in bytes.
pub const STRING_WIDTH: usize = 8;

/// Null value of a float header.
pub const FNULL: f32 = -12345.0;
/// Null value of an integer header.
pub const INULL: i32 = -12345;
/// Null value of a string header slot.
pub const SNULL: [u8; STRING_WIDTH] = *b"-12345  ";

/// Lowest header version accepted as a sane `nvhdr` (exclusive bound is 0).
pub const NVHDR_MIN: i32 = 1;
/// Highest header version accepted as a sane `nvhdr`.
pub const NVHDR_MAX: i32 = 19;

#[rustfmt::skip]
pub const FLOAT_HEADERS: [&str; NFLOAT] = [
    "delta", "depmin", "depmax", "scale", "odelta", "b", "e", "o", "a", "internal0",
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9",
    "f", "resp0", "resp1", "resp2", "resp3", "resp4", "resp5", "resp6", "resp7", "resp8",
    "resp9", "stla", "stlo", "stel", "stdp", "evla", "evlo", "evel", "evdp", "mag",
    "user0", "user1", "user2", "user3", "user4", "user5", "user6", "user7", "user8", "user9",
    "dist", "az", "baz", "gcarc", "internal1", "internal2", "depmen", "cmpaz", "cmpinc",
    "xminimum", "xmaximum", "yminimum", "ymaximum", "unused6", "unused7", "unused8",
    "unused9", "unused10", "unused11", "unused12",
];

#[rustfmt::skip]
pub const INT_HEADERS: [&str; NINT] = [
    "nzyear", "nzjday", "nzhour", "nzmin", "nzsec", "nzmsec", "nvhdr", "norid", "nevid", "npts",
    "internal3", "nwfid", "nxsize", "nysize", "unused15", "iftype", "idep", "iztype",
    "unused16", "iinst", "istreg", "ievreg", "ievtyp", "iqual", "isynth", "imagtyp", "imagsrc",
    "unused19", "unused20", "unused21", "unused22", "unused23", "unused24", "unused25",
    "unused26", "leven", "lpspol", "lovrok", "lcalda", "unused27",
];

/// String header names. `kevnm` and `kevnm2` are the two halves of the
/// 16-character event name.
#[rustfmt::skip]
pub const STRING_HEADERS: [&str; NSTRING] = [
    "kstnm", "kevnm", "kevnm2", "khole", "ko", "ka", "kt0", "kt1", "kt2", "kt3", "kt4", "kt5",
    "kt6", "kt7", "kt8", "kt9", "kf", "kuser0", "kuser1", "kuser2", "kcmpnm", "knetwk",
    "kdatrd", "kinst",
];

/// Logical (boolean flag) integer headers.
pub const LOGICAL_HEADERS: [&str; 4] = ["leven", "lpspol", "lovrok", "lcalda"];

/// Positions of the fields the codecs and validator touch directly.
pub(crate) mod idx {
    pub const DELTA: usize = 0;
    pub const DEPMIN: usize = 1;
    pub const DEPMAX: usize = 2;
    pub const B: usize = 5;
    pub const O: usize = 7;
    pub const A: usize = 8;
    pub const T0: usize = 10;
    pub const DEPMEN: usize = 56;

    pub const NZYEAR: usize = 0;
    pub const NZJDAY: usize = 1;
    pub const NZHOUR: usize = 2;
    pub const NZMIN: usize = 3;
    pub const NZSEC: usize = 4;
    pub const NZMSEC: usize = 5;
    pub const NVHDR: usize = 6;
    pub const NPTS: usize = 9;
    pub const IZTYPE: usize = 17;
    pub const LCALDA: usize = 38;

    pub const KEVNM: usize = 1;
    pub const KEVNM2: usize = 2;
}

/// Symbolic names of the enumerated integer header values.
#[rustfmt::skip]
const ENUM_VALUES: &[(&str, i32)] = &[
    ("itime", 1), ("irlim", 2), ("iamph", 3), ("ixy", 4), ("iunkn", 5),
    ("idisp", 6), ("ivel", 7), ("iacc", 8), ("ib", 9), ("iday", 10),
    ("io", 11), ("ia", 12), ("it0", 13), ("it1", 14), ("it2", 15),
    ("it3", 16), ("it4", 17), ("it5", 18), ("it6", 19), ("it7", 20),
    ("it8", 21), ("it9", 22), ("iradnv", 23), ("itannv", 24), ("iradev", 25),
    ("itanev", 26), ("inorth", 27), ("ieast", 28), ("ihorza", 29), ("idown", 30),
    ("iup", 31), ("illlbb", 32), ("iwwsn1", 33), ("iwwsn2", 34), ("ihglp", 35),
    ("isro", 36), ("inucl", 37), ("ipren", 38), ("ipostn", 39), ("iquake", 40),
    ("ipreq", 41), ("ipostq", 42), ("ichem", 43), ("iother", 44), ("igood", 45),
    ("iglch", 46), ("idrop", 47), ("ilowsn", 48), ("irldta", 49), ("ivolts", 50),
    ("ixyz", 51), ("imb", 52), ("ims", 53), ("iml", 54), ("imw", 55),
    ("imd", 56), ("imx", 57), ("ineic", 58), ("ipdeq", 59), ("ipdew", 60),
    ("ipde", 61), ("iisc", 62), ("ireb", 63), ("iusgs", 64), ("ibrk", 65),
    ("icaltech", 66), ("illnl", 67), ("ievloc", 68), ("ijsop", 69), ("iuser", 70),
    ("iunknown", 71), ("iqb", 72), ("iqb1", 73), ("iqb2", 74), ("iqbx", 75),
    ("iqmt", 76), ("ieq", 77), ("ieq1", 78), ("ieq2", 79), ("ime", 80),
    ("iex", 81), ("inu", 82), ("inc", 83), ("io_", 84), ("il", 85),
    ("ir", 86), ("it", 87), ("iu", 88), ("ieq3", 89), ("ieq0", 90),
    ("iex0", 91), ("iqc", 92), ("iqb0", 93), ("igey", 94), ("ilit", 95),
    ("imet", 96), ("iodor", 97), ("ios", 103),
];

/// Enumerated integer headers and the symbolic values each accepts.
#[rustfmt::skip]
pub const ENUM_HEADERS: &[(&str, &[&str])] = &[
    ("iftype", &["itime", "irlim", "iamph", "ixy", "ixyz"]),
    ("idep", &["iunkn", "idisp", "ivel", "ivolts", "iacc"]),
    (
        "iztype",
        &[
            "iunkn", "ib", "iday", "io", "ia", "it0", "it1", "it2", "it3", "it4", "it5", "it6",
            "it7", "it8", "it9",
        ],
    ),
    ("imagtyp", &["imb", "ims", "iml", "imw", "imd", "imx"]),
    (
        "imagsrc",
        &[
            "ineic", "ipdeq", "ipdew", "ipde", "iisc", "ireb", "iusgs", "ibrk", "icaltech",
            "illnl", "ievloc", "ijsop", "iuser", "iunknown",
        ],
    ),
    (
        "ievtyp",
        &[
            "iunkn", "inucl", "ipren", "ipostn", "iquake", "ipreq", "ipostq", "ichem", "iqb",
            "iqb1", "iqb2", "iqbx", "iqmt", "ieq", "ieq1", "ieq2", "ime", "iex", "inu", "inc",
            "io_", "il", "ir", "it", "iu", "ieq3", "ieq0", "iex0", "iqc", "iqb0", "igey", "ilit",
            "imet", "iodor", "ios", "iother",
        ],
    ),
    ("iqual", &["igood", "iglch", "idrop", "ilowsn", "iother"]),
    ("isynth", &["irldta"]),
];

/// Position of a float header by name.
pub fn float_index(name: &str) -> Option<usize> {
    FLOAT_HEADERS.iter().position(|&h| h == name)
}

/// Position of an integer header by name.
pub fn int_index(name: &str) -> Option<usize> {
    INT_HEADERS.iter().position(|&h| h == name)
}

/// Position of a string header slot by name.
pub fn string_index(name: &str) -> Option<usize> {
    STRING_HEADERS.iter().position(|&h| h == name)
}

/// Integer code of a symbolic enumerated value, e.g. `"ib"` -> 9.
pub fn enum_code(name: &str) -> Option<i32> {
    ENUM_VALUES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Symbolic name of an enumerated integer code, e.g. 9 -> `"ib"`.
pub fn enum_name(code: i32) -> Option<&'static str> {
    ENUM_VALUES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|&(name, _)| name)
}

/// Integer codes accepted by an enumerated header, or `None` if the
/// header is not enumerated.
pub fn accepted_values(header: &str) -> Option<Vec<i32>> {
    ENUM_HEADERS
        .iter()
        .find(|(h, _)| *h == header)
        .map(|(_, names)| names.iter().filter_map(|n| enum_code(n)).collect())
}

/// Whether `value` is acceptable for the enumerated header `header`.
///
/// Non-enumerated headers never validate.
pub fn is_valid_enum_int(header: &str, value: i32, allow_null: bool) -> bool {
    if allow_null && value == INULL {
        return true;
    }
    accepted_values(header).is_some_and(|codes| codes.contains(&value))
}
