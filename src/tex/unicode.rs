//! # TeX to Unicode translation.
//!
//! Replaces accent commands, named control symbols, dashes, quotes, and a
//! small set of math-mode symbols with their Unicode equivalents, and strips
//! the braces that survive. Unknown sequences degrade gracefully: the name
//! is emitted without its backslash and a diagnostic is recorded.

use crate::diag::Reporter;
use crate::pos::Pos;

use super::{control_sequence, group};

/// Accent commands: the symbol accents plus the letter-named ones.
const ACCENTS: &str = "`'^\"~=.uvHtcdbrk";

/// Translate TeX markup in `value` to plain Unicode.
///
/// ```
/// use bibdb::{tex_to_unicode, Pos, Reporter};
///
/// let mut rpt = Reporter::new();
/// let out = tex_to_unicode(r"Erd{\H{o}}s", &Pos::unknown(), &mut rpt);
/// assert_eq!(out, "Erdős");
/// assert!(rpt.is_empty());
/// ```
pub fn tex_to_unicode(value: &str, pos: &Pos, rpt: &mut Reporter) -> String {
    translate(value, Some((rpt, pos)))
}

/// The worker behind [`tex_to_unicode`] and
/// [`first_letter`](super::first_letter); with `diag` absent it stays quiet.
pub(crate) fn translate(input: &str, diag: Option<(&mut Reporter, &Pos)>) -> String {
    let mut tr = Translator {
        out: String::with_capacity(input.len()),
        math: false,
        diag,
    };
    tr.run(input);
    tr.out
}

struct Translator<'a, 'p> {
    out: String,
    math: bool,
    diag: Option<(&'a mut Reporter, &'p Pos)>,
}

impl Translator<'_, '_> {
    fn warn(&mut self, message: String) {
        if let Some((rpt, pos)) = self.diag.as_mut() {
            rpt.warn((*pos).clone(), message);
        }
    }

    fn run(&mut self, input: &str) {
        let mut rest = input;
        while let Some(c) = rest.chars().next() {
            match c {
                '\\' => {
                    let (name, tail) = control_sequence(&rest[1..]);
                    rest = self.control(name, tail);
                }
                '$' => {
                    self.math = !self.math;
                    self.out.push('$');
                    rest = &rest[1..];
                }
                // surviving braces are dropped
                '{' | '}' => rest = &rest[1..],
                '~' => {
                    self.out.push('\u{a0}');
                    rest = &rest[1..];
                }
                '-' if !self.math && rest.starts_with("---") => {
                    self.out.push('\u{2014}');
                    rest = &rest[3..];
                }
                '-' if !self.math && rest.starts_with("--") => {
                    self.out.push('\u{2013}');
                    rest = &rest[2..];
                }
                '`' if rest.starts_with("``") => {
                    self.out.push('\u{201c}');
                    rest = &rest[2..];
                }
                '\'' if rest.starts_with("''") => {
                    self.out.push('\u{201d}');
                    rest = &rest[2..];
                }
                _ => {
                    self.out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
    }

    /// Handle a control sequence `name`, returning the remaining input.
    fn control<'s>(&mut self, name: &'s str, tail: &'s str) -> &'s str {
        if self.math {
            match math_symbol(name) {
                Some(sym) => self.out.push_str(sym),
                // unknown math stays literal
                None => {
                    self.out.push('\\');
                    self.out.push_str(name);
                }
            }
            return tail;
        }

        let mut chars = name.chars();
        if let (Some(accent), None) = (chars.next(), chars.next()) {
            if ACCENTS.contains(accent) {
                return self.accent(accent, tail);
            }
        }

        if let Some(sym) = control_symbol(name) {
            self.out.push_str(sym);
            if name.bytes().all(|b| b.is_ascii_alphabetic()) && !name.is_empty() {
                return eat_separator(tail);
            }
            return tail;
        }

        self.warn(format!("unknown control sequence `\\{name}`"));
        self.out.push_str(name);
        tail
    }

    /// Handle an accent command: the argument is the next non-space
    /// character, a brace group, or a control-sequence name.
    fn accent<'s>(&mut self, accent: char, tail: &'s str) -> &'s str {
        let arg = tail.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if arg.starts_with('{') {
            match group(arg) {
                Some((contents, rest)) => {
                    self.accent_on(accent, contents);
                    rest
                }
                None => {
                    self.accent_on(accent, &arg[1..]);
                    ""
                }
            }
        } else if let Some(after) = arg.strip_prefix('\\') {
            let (name, rest) = control_sequence(after);
            self.accent_on_control(accent, name);
            rest
        } else if let Some(base) = arg.chars().next() {
            self.combine_push(accent, base);
            &arg[base.len_utf8()..]
        } else {
            self.warn(format!("missing argument for accent `\\{accent}`"));
            arg
        }
    }

    /// Apply an accent to the contents of its brace group.
    fn accent_on(&mut self, accent: char, contents: &str) {
        if let Some(after) = contents.strip_prefix('\\') {
            let (name, rest) = control_sequence(after);
            self.accent_on_control(accent, name);
            self.run(rest);
        } else if let Some(base) = contents.chars().next() {
            self.combine_push(accent, base);
            self.run(&contents[base.len_utf8()..]);
        } else {
            self.warn(format!("missing argument for accent `\\{accent}`"));
        }
    }

    /// Apply an accent to a control-sequence argument such as `\'\i`.
    fn accent_on_control(&mut self, accent: char, name: &str) {
        match name {
            // the dotless letters exist to carry accents
            "i" => self.combine_push(accent, 'i'),
            "j" => self.combine_push(accent, 'j'),
            _ => match control_symbol(name) {
                Some(sym) => {
                    let mut chars = sym.chars();
                    if let Some(base) = chars.next() {
                        self.combine_push(accent, base);
                        self.out.push_str(chars.as_str());
                    }
                }
                None => {
                    self.warn(format!("unknown control sequence `\\{name}`"));
                    self.out.push_str(name);
                }
            },
        }
    }

    fn combine_push(&mut self, accent: char, base: char) {
        // the tie joins its argument letters with U+0361
        if accent == 't' {
            self.out.push(base);
            self.out.push('\u{361}');
            return;
        }
        match combine(accent, base) {
            Some(c) => self.out.push(c),
            None => {
                self.warn(format!("cannot apply accent `\\{accent}` to `{base}`"));
                self.out.push(base);
            }
        }
    }
}

/// Consume the argument separator after a control word: a literal `{}` or a
/// whitespace run.
fn eat_separator(tail: &str) -> &str {
    match tail.strip_prefix("{}") {
        Some(rest) => rest,
        None => tail.trim_start_matches(|c: char| c.is_ascii_whitespace()),
    }
}

/// Named control symbols and standard escapes.
fn control_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "oe" => "œ",
        "OE" => "Œ",
        "ae" => "æ",
        "AE" => "Æ",
        "aa" => "å",
        "AA" => "Å",
        "o" => "ø",
        "O" => "Ø",
        "l" => "ł",
        "L" => "Ł",
        "ss" => "ß",
        "i" => "ı",
        "j" => "ȷ",
        "P" => "¶",
        "S" => "§",
        "dag" => "†",
        "ddag" => "‡",
        "pounds" => "£",
        "copyright" => "©",
        "dots" | "ldots" => "…",
        "&" => "&",
        "%" => "%",
        "$" => "$",
        "#" => "#",
        "_" => "_",
        "{" => "{",
        "}" => "}",
        "," => "\u{2009}",
        // discretionary hyphen
        "-" => "",
        _ => return None,
    })
}

/// Math-mode substitutions.
fn math_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "times" => "×",
        "pm" => "±",
        "mp" => "∓",
        "cdot" => "⋅",
        "div" => "÷",
        "le" | "leq" => "≤",
        "ge" | "geq" => "≥",
        "ne" | "neq" => "≠",
        "approx" => "≈",
        "sim" => "∼",
        "equiv" => "≡",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "sqrt" => "√",
        "in" => "∈",
        "subset" => "⊂",
        "cup" => "∪",
        "cap" => "∩",
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "circ" => "∘",
        "ast" => "∗",
        "star" => "⋆",
        "prime" => "′",
        "ell" => "ℓ",
        "hbar" => "ℏ",
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        _ => return None,
    })
}

/// The accent plus base-letter table, precomposed.
fn combine(accent: char, base: char) -> Option<char> {
    let composed = match accent {
        '`' => match base {
            'A' => 'À',
            'E' => 'È',
            'I' => 'Ì',
            'N' => 'Ǹ',
            'O' => 'Ò',
            'U' => 'Ù',
            'W' => 'Ẁ',
            'Y' => 'Ỳ',
            'a' => 'à',
            'e' => 'è',
            'i' => 'ì',
            'n' => 'ǹ',
            'o' => 'ò',
            'u' => 'ù',
            'w' => 'ẁ',
            'y' => 'ỳ',
            _ => return None,
        },
        '\'' => match base {
            'A' => 'Á',
            'C' => 'Ć',
            'E' => 'É',
            'G' => 'Ǵ',
            'I' => 'Í',
            'K' => 'Ḱ',
            'L' => 'Ĺ',
            'M' => 'Ḿ',
            'N' => 'Ń',
            'O' => 'Ó',
            'P' => 'Ṕ',
            'R' => 'Ŕ',
            'S' => 'Ś',
            'U' => 'Ú',
            'W' => 'Ẃ',
            'Y' => 'Ý',
            'Z' => 'Ź',
            'a' => 'á',
            'c' => 'ć',
            'e' => 'é',
            'g' => 'ǵ',
            'i' => 'í',
            'k' => 'ḱ',
            'l' => 'ĺ',
            'm' => 'ḿ',
            'n' => 'ń',
            'o' => 'ó',
            'p' => 'ṕ',
            'r' => 'ŕ',
            's' => 'ś',
            'u' => 'ú',
            'w' => 'ẃ',
            'y' => 'ý',
            'z' => 'ź',
            _ => return None,
        },
        '^' => match base {
            'A' => 'Â',
            'C' => 'Ĉ',
            'E' => 'Ê',
            'G' => 'Ĝ',
            'H' => 'Ĥ',
            'I' => 'Î',
            'J' => 'Ĵ',
            'O' => 'Ô',
            'S' => 'Ŝ',
            'U' => 'Û',
            'W' => 'Ŵ',
            'Y' => 'Ŷ',
            'Z' => 'Ẑ',
            'a' => 'â',
            'c' => 'ĉ',
            'e' => 'ê',
            'g' => 'ĝ',
            'h' => 'ĥ',
            'i' => 'î',
            'j' => 'ĵ',
            'o' => 'ô',
            's' => 'ŝ',
            'u' => 'û',
            'w' => 'ŵ',
            'y' => 'ŷ',
            'z' => 'ẑ',
            _ => return None,
        },
        '"' => match base {
            'A' => 'Ä',
            'E' => 'Ë',
            'H' => 'Ḧ',
            'I' => 'Ï',
            'O' => 'Ö',
            'U' => 'Ü',
            'W' => 'Ẅ',
            'X' => 'Ẍ',
            'Y' => 'Ÿ',
            'a' => 'ä',
            'e' => 'ë',
            'h' => 'ḧ',
            'i' => 'ï',
            'o' => 'ö',
            't' => 'ẗ',
            'u' => 'ü',
            'w' => 'ẅ',
            'x' => 'ẍ',
            'y' => 'ÿ',
            _ => return None,
        },
        '~' => match base {
            'A' => 'Ã',
            'E' => 'Ẽ',
            'I' => 'Ĩ',
            'N' => 'Ñ',
            'O' => 'Õ',
            'U' => 'Ũ',
            'V' => 'Ṽ',
            'Y' => 'Ỹ',
            'a' => 'ã',
            'e' => 'ẽ',
            'i' => 'ĩ',
            'n' => 'ñ',
            'o' => 'õ',
            'u' => 'ũ',
            'v' => 'ṽ',
            'y' => 'ỹ',
            _ => return None,
        },
        '=' => match base {
            'A' => 'Ā',
            'E' => 'Ē',
            'G' => 'Ḡ',
            'I' => 'Ī',
            'O' => 'Ō',
            'U' => 'Ū',
            'Y' => 'Ȳ',
            'a' => 'ā',
            'e' => 'ē',
            'g' => 'ḡ',
            'i' => 'ī',
            'o' => 'ō',
            'u' => 'ū',
            'y' => 'ȳ',
            _ => return None,
        },
        '.' => match base {
            'A' => 'Ȧ',
            'B' => 'Ḃ',
            'C' => 'Ċ',
            'D' => 'Ḋ',
            'E' => 'Ė',
            'F' => 'Ḟ',
            'G' => 'Ġ',
            'H' => 'Ḣ',
            'I' => 'İ',
            'M' => 'Ṁ',
            'N' => 'Ṅ',
            'O' => 'Ȯ',
            'P' => 'Ṗ',
            'R' => 'Ṙ',
            'S' => 'Ṡ',
            'T' => 'Ṫ',
            'W' => 'Ẇ',
            'X' => 'Ẋ',
            'Y' => 'Ẏ',
            'Z' => 'Ż',
            'a' => 'ȧ',
            'b' => 'ḃ',
            'c' => 'ċ',
            'd' => 'ḋ',
            'e' => 'ė',
            'f' => 'ḟ',
            'g' => 'ġ',
            'h' => 'ḣ',
            'm' => 'ṁ',
            'n' => 'ṅ',
            'o' => 'ȯ',
            'p' => 'ṗ',
            'r' => 'ṙ',
            's' => 'ṡ',
            't' => 'ṫ',
            'w' => 'ẇ',
            'x' => 'ẋ',
            'y' => 'ẏ',
            'z' => 'ż',
            _ => return None,
        },
        'u' => match base {
            'A' => 'Ă',
            'E' => 'Ĕ',
            'G' => 'Ğ',
            'I' => 'Ĭ',
            'O' => 'Ŏ',
            'U' => 'Ŭ',
            'a' => 'ă',
            'e' => 'ĕ',
            'g' => 'ğ',
            'i' => 'ĭ',
            'o' => 'ŏ',
            'u' => 'ŭ',
            _ => return None,
        },
        'v' => match base {
            'A' => 'Ǎ',
            'C' => 'Č',
            'D' => 'Ď',
            'E' => 'Ě',
            'G' => 'Ǧ',
            'H' => 'Ȟ',
            'I' => 'Ǐ',
            'K' => 'Ǩ',
            'L' => 'Ľ',
            'N' => 'Ň',
            'O' => 'Ǒ',
            'R' => 'Ř',
            'S' => 'Š',
            'T' => 'Ť',
            'U' => 'Ǔ',
            'Z' => 'Ž',
            'a' => 'ǎ',
            'c' => 'č',
            'd' => 'ď',
            'e' => 'ě',
            'g' => 'ǧ',
            'h' => 'ȟ',
            'i' => 'ǐ',
            'j' => 'ǰ',
            'k' => 'ǩ',
            'l' => 'ľ',
            'n' => 'ň',
            'o' => 'ǒ',
            'r' => 'ř',
            's' => 'š',
            't' => 'ť',
            'u' => 'ǔ',
            'z' => 'ž',
            _ => return None,
        },
        'H' => match base {
            'O' => 'Ő',
            'U' => 'Ű',
            'o' => 'ő',
            'u' => 'ű',
            _ => return None,
        },
        'c' => match base {
            'C' => 'Ç',
            'D' => 'Ḑ',
            'E' => 'Ȩ',
            'G' => 'Ģ',
            'H' => 'Ḩ',
            'K' => 'Ķ',
            'L' => 'Ļ',
            'N' => 'Ņ',
            'R' => 'Ŗ',
            'S' => 'Ş',
            'T' => 'Ţ',
            'c' => 'ç',
            'd' => 'ḑ',
            'e' => 'ȩ',
            'g' => 'ģ',
            'h' => 'ḩ',
            'k' => 'ķ',
            'l' => 'ļ',
            'n' => 'ņ',
            'r' => 'ŗ',
            's' => 'ş',
            't' => 'ţ',
            _ => return None,
        },
        'd' => match base {
            'A' => 'Ạ',
            'B' => 'Ḅ',
            'D' => 'Ḍ',
            'E' => 'Ẹ',
            'H' => 'Ḥ',
            'I' => 'Ị',
            'K' => 'Ḳ',
            'L' => 'Ḷ',
            'M' => 'Ṃ',
            'N' => 'Ṇ',
            'O' => 'Ọ',
            'R' => 'Ṛ',
            'S' => 'Ṣ',
            'T' => 'Ṭ',
            'U' => 'Ụ',
            'V' => 'Ṿ',
            'W' => 'Ẉ',
            'Y' => 'Ỵ',
            'Z' => 'Ẓ',
            'a' => 'ạ',
            'b' => 'ḅ',
            'd' => 'ḍ',
            'e' => 'ẹ',
            'h' => 'ḥ',
            'i' => 'ị',
            'k' => 'ḳ',
            'l' => 'ḷ',
            'm' => 'ṃ',
            'n' => 'ṇ',
            'o' => 'ọ',
            'r' => 'ṛ',
            's' => 'ṣ',
            't' => 'ṭ',
            'u' => 'ụ',
            'v' => 'ṿ',
            'w' => 'ẉ',
            'y' => 'ỵ',
            'z' => 'ẓ',
            _ => return None,
        },
        'b' => match base {
            'B' => 'Ḇ',
            'D' => 'Ḏ',
            'K' => 'Ḵ',
            'L' => 'Ḻ',
            'N' => 'Ṉ',
            'R' => 'Ṟ',
            'T' => 'Ṯ',
            'Z' => 'Ẕ',
            'b' => 'ḇ',
            'd' => 'ḏ',
            'h' => 'ẖ',
            'k' => 'ḵ',
            'l' => 'ḻ',
            'n' => 'ṉ',
            'r' => 'ṟ',
            't' => 'ṯ',
            'z' => 'ẕ',
            _ => return None,
        },
        'r' => match base {
            'A' => 'Å',
            'U' => 'Ů',
            'a' => 'å',
            'u' => 'ů',
            'w' => 'ẘ',
            'y' => 'ẙ',
            _ => return None,
        },
        'k' => match base {
            'A' => 'Ą',
            'E' => 'Ę',
            'I' => 'Į',
            'O' => 'Ǫ',
            'U' => 'Ų',
            'a' => 'ą',
            'e' => 'ę',
            'i' => 'į',
            'o' => 'ǫ',
            'u' => 'ų',
            _ => return None,
        },
        _ => return None,
    };
    Some(composed)
}
