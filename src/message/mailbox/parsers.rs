//! Partial parsers implementation of [RFC2822]: Internet Message
//! Format.
//!
//! Names are returned as written, encoded words are not decoded.
//! Group syntax and domain literals are not supported.
//!
//! [RFC2822]: https://datatracker.ietf.org/doc/html/rfc2822

use chumsky::{error::Cheap, prelude::*};

/// Display name and `(user, domain)`
pub(super) type ParsedMailbox = (Option<String>, (String, String));

// WSP             =       SP / HTAB
fn wsp() -> impl Parser<char, char, Error = Cheap<char>> {
    one_of([' ', '\t'])
}

// CRLF            =       CR LF
fn crlf() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    just('\r').chain(just('\n'))
}

// text            =       %d1-9 /         ; Characters excluding CR and LF
//                         %d11 /
//                         %d12 /
//                         %d14-127 /
//                         obs-text
fn text() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| !matches!(*c, '\0' | '\r' | '\n'))
}

// 3.2.2. Quoted characters
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.2

// quoted-pair     =       ("\" text) / obs-qp
fn quoted_pair() -> impl Parser<char, char, Error = Cheap<char>> {
    just('\\').ignore_then(text())
}

// 3.2.3. Folding white space and comments
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.3

// FWS             =       ([*WSP CRLF] 1*WSP) /   ; Folding white space
//                         obs-FWS
fn fws() -> impl Parser<char, (), Error = Cheap<char>> {
    wsp()
        .repeated()
        .then(crlf())
        .or_not()
        .then(wsp().repeated().at_least(1))
        .ignored()
}

// ctext           =       NO-WS-CTL /     ; Non white space controls
//
//                         %d33-39 /       ; The rest of the US-ASCII
//                         %d42-91 /       ;  characters not including "(",
//                         %d93-126        ;  ")", or "\"
fn ctext() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| !matches!(*c, '\0' | '(' | ')' | '\\' | ' ' | '\t' | '\r' | '\n'))
}

// comment         =       "(" *([FWS] ccontent) [FWS] ")"
// ccontent        =       ctext / quoted-pair / comment
fn comment() -> impl Parser<char, (), Error = Cheap<char>> {
    recursive(|comment| {
        choice((ctext().ignored(), quoted_pair().ignored(), comment, fws()))
            .repeated()
            .delimited_by(just('(').ignored(), just(')').ignored())
            .ignored()
    })
}

// CFWS            =       *([FWS] comment) (([FWS] comment) / FWS)
fn cfws() -> impl Parser<char, (), Error = Cheap<char>> {
    choice((fws(), comment())).repeated().at_least(1).ignored()
}

// 3.2.4. Atom
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.4

// atext           =       ALPHA / DIGIT / ; Any character except controls,
//                         "!" / "#" /     ;  SP, and specials.
//                         "$" / "%" /     ;  Used for atoms
//                         "&" / "'" /
//                         "*" / "+" /
//                         "-" / "/" /
//                         "=" / "?" /
//                         "^" / "_" /
//                         "`" / "{" /
//                         "|" / "}" /
//                         "~"
fn atext() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| {
        c.is_ascii_alphanumeric()
            || matches!(
                *c,
                '!' | '#'
                    | '$'
                    | '%'
                    | '&'
                    | '\''
                    | '*'
                    | '+'
                    | '-'
                    | '/'
                    | '='
                    | '?'
                    | '^'
                    | '_'
                    | '`'
                    | '{'
                    | '|'
                    | '}'
                    | '~'
            )
            // also allow non ASCII UTF8 chars, RFC 6532
            || (!c.is_ascii() && !c.is_whitespace())
    })
}

// atom            =       [CFWS] 1*atext [CFWS]
fn atom() -> impl Parser<char, String, Error = Cheap<char>> {
    cfws()
        .or_not()
        .ignore_then(atext().repeated().at_least(1).collect())
        .then_ignore(cfws().or_not())
}

// dot-atom        =       [CFWS] dot-atom-text [CFWS]
fn dot_atom() -> impl Parser<char, String, Error = Cheap<char>> {
    cfws()
        .or_not()
        .ignore_then(dot_atom_text())
        .then_ignore(cfws().or_not())
}

// dot-atom-text   =       1*atext *("." 1*atext)
fn dot_atom_text() -> impl Parser<char, String, Error = Cheap<char>> {
    atext()
        .repeated()
        .at_least(1)
        .chain::<char, Vec<char>, _>(
            just('.')
                .chain(atext().repeated().at_least(1))
                .repeated()
                .flatten(),
        )
        .collect()
}

// 3.2.5. Quoted strings
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.5

// qtext           =       NO-WS-CTL /     ; Non white space controls
//
//                         %d33 /          ; The rest of the US-ASCII
//                         %d35-91 /       ;  characters not including "\"
//                         %d93-126        ;  or the quote character
fn qtext() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| !matches!(*c, '\0' | '"' | '\\' | '\r' | '\n'))
}

// quoted-string   =       [CFWS]
//                         DQUOTE *([FWS] qcontent) [FWS] DQUOTE
//                         [CFWS]
fn quoted_string() -> impl Parser<char, String, Error = Cheap<char>> {
    // folded lines are unfolded, the white space after the CRLF is kept
    let qcontent = choice((qtext(), quoted_pair(), crlf().ignore_then(wsp())));

    cfws()
        .or_not()
        .ignore_then(just('"'))
        .ignore_then(qcontent.repeated().collect())
        .then_ignore(just('"'))
        .then_ignore(cfws().or_not())
}

// 3.2.6. Miscellaneous tokens
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.6

// word            =       atom / quoted-string
fn word() -> impl Parser<char, String, Error = Cheap<char>> {
    choice((quoted_string(), atom()))
}

// phrase          =       1*word / obs-phrase
// obs-phrase      =       word *(word / "." / CFWS)
fn phrase() -> impl Parser<char, String, Error = Cheap<char>> {
    let dot = just('.').then_ignore(cfws().or_not()).to(None);

    word()
        .then(choice((word().map(Some), dot)).repeated())
        .map(|(first, rest)| {
            rest.into_iter().fold(first, |mut phrase, word| {
                match word {
                    Some(word) => {
                        phrase.push(' ');
                        phrase.push_str(&word);
                    }
                    None => phrase.push('.'),
                }
                phrase
            })
        })
}

// 3.4. Address Specification
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.4

// mailbox         =       name-addr / addr-spec
fn mailbox_item() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    choice((name_addr(), addr_spec().map(|addr| (None, addr))))
}

/// A single mailbox, surrounded by optional white space
pub(super) fn mailbox() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    mailbox_item().padded().then_ignore(end())
}

// name-addr       =       [display-name] angle-addr
fn name_addr() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    display_name()
        .or_not()
        .map(Option::flatten)
        .then(angle_addr())
}

// angle-addr      =       [CFWS] "<" addr-spec ">" [CFWS] / obs-angle-addr
fn angle_addr() -> impl Parser<char, (String, String), Error = Cheap<char>> {
    cfws()
        .or_not()
        .ignore_then(addr_spec().delimited_by(just('<').ignored(), just('>').ignored()))
        .then_ignore(cfws().or_not())
}

// display-name    =       phrase
fn display_name() -> impl Parser<char, Option<String>, Error = Cheap<char>> {
    phrase().map(|name| Some(name).filter(|name| !name.trim().is_empty()))
}

// mailbox-list    =       (mailbox *("," mailbox)) / obs-mbox-list
// obs-mbox-list   =       1*([mailbox] [CFWS] "," [CFWS]) [mailbox]
pub(super) fn mailbox_list() -> impl Parser<char, Vec<ParsedMailbox>, Error = Cheap<char>> {
    mailbox_item()
        .or_not()
        .separated_by(just(',').padded())
        .map(|mailboxes| mailboxes.into_iter().flatten().collect::<Vec<_>>())
        .padded()
        .then_ignore(end())
}

// 3.4.1. Addr-spec specification
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.4.1

// addr-spec       =       local-part "@" domain
fn addr_spec() -> impl Parser<char, (String, String), Error = Cheap<char>> {
    local_part().then_ignore(just('@')).then(domain())
}

// local-part      =       dot-atom / quoted-string / obs-local-part
fn local_part() -> impl Parser<char, String, Error = Cheap<char>> {
    choice((dot_atom(), quoted_string()))
}

// domain          =       dot-atom / domain-literal / obs-domain
fn domain() -> impl Parser<char, String, Error = Cheap<char>> {
    dot_atom()
}
