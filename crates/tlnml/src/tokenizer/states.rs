//! Tokenizer state machine definitions.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    Text,
    /// Opening delimiter consumed; direction not known yet.
    TagAmbiguous,
    StartTag(StartTagState),
    EndTag(EndTagState),
    /// After `<!`, counting the dashes of the comment opener.
    CommentOpen { dashes: u8 },
    Comment,
    /// Discarding input up to the end of a broken tag head.
    Resync,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StartTagState {
    Name,
    /// Between attributes.
    Attributes,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValueQuoted(char),
    AttrValueUnquoted,
    SelfClosePending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EndTagState {
    Name,
    AfterName,
}
