//! Provides the `color_from_hex!` macro that expands an RGB or RGBA colour,
//! written either as a `0x` integer literal or as a `"#rrggbb"` string, into a
//! byte array at compile time.
//!
//! # Examples
//! ```
//! # use hex_colors::color_from_hex;
//! const LEAF: [u8; 3] = color_from_hex!(0x4caf50);
//! # fn main() {
//! assert_eq!(LEAF, [0x4c, 0xaf, 0x50]);
//! assert_eq!(color_from_hex!("#FFF8E1"), [0xff, 0xf8, 0xe1]);
//! assert_eq!(color_from_hex!("a1b2c3d4"), [0xa1, 0xb2, 0xc3, 0xd4]);
//! # }
//! ```

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Lit,
};

struct HexColor {
    bytes: Vec<u8>,
}

fn digits(input: ParseStream, raw: &str) -> syn::Result<Vec<u8>> {
    if !matches!(raw.len(), 6 | 8) {
        return Err(input.error("expected 6 or 8 hex digits, ex: 4c4c4cff"));
    }
    raw.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| input.error(format!("`{raw}` is not a hex colour")))
        })
        .collect()
}

impl Parse for HexColor {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let bytes = match input.parse::<Lit>()? {
            Lit::Int(lit) => {
                if !lit.suffix().is_empty() {
                    return Err(input.error("hex literal cannot carry a type suffix"));
                }
                let token = lit.token().to_string().replace('_', "");
                match token.strip_prefix("0x") {
                    Some(raw) => digits(input, raw)?,
                    None => return Err(input.error("expected `0x` prefix")),
                }
            }
            Lit::Str(lit) => {
                let value = lit.value();
                digits(input, value.strip_prefix('#').unwrap_or(&value))?
            }
            _ => return Err(input.error("expected `0x` integer or string literal")),
        };

        Ok(Self { bytes })
    }
}

/// Expands a hex colour literal into `[u8; 3]` or `[u8; 4]`.
#[proc_macro]
pub fn color_from_hex(input: TokenStream) -> TokenStream {
    let HexColor { bytes } = parse_macro_input!(input as HexColor);
    quote!([#(#bytes),*]).into()
}
