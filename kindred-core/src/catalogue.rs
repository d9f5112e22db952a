//! The closed, ordered catalogue of narrative action patterns.
//!
//! Each entry maps a textual trigger to a per-axis emotional impact and a
//! readable label. The catalogue is exhaustive for the engine's purposes:
//! text that matches nothing simply produces no actions. Patterns are
//! evaluated in table order, positives before negatives, and matcher
//! semantics are case-insensitive with the windowing applied by the
//! parser.
//!
//! Labels live in the table next to their matcher, so the readable form
//! of an action is a data fact rather than string surgery at parse time.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::EmotionAxis::{self, Fear, Intimacy, Power, Respect, Trust};

/// Whether a pattern describes a bonding or a damaging action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Action that builds the relationship.
    Positive,
    /// Action that damages the relationship.
    Negative,
}

/// One catalogue entry: matcher source, readable label, per-axis impact.
#[derive(Debug, Clone, Copy)]
pub struct ActionPattern {
    /// Regex source. Also serves as the pattern's identifier.
    pub pattern: &'static str,
    /// Human-readable description of the action.
    pub label: &'static str,
    /// Unclamped per-axis emotional impact.
    pub impact: &'static [(EmotionAxis, f32)],
    /// Which table this entry belongs to.
    pub polarity: Polarity,
}

const fn pos(
    pattern: &'static str,
    label: &'static str,
    impact: &'static [(EmotionAxis, f32)],
) -> ActionPattern {
    ActionPattern { pattern, label, impact, polarity: Polarity::Positive }
}

const fn neg(
    pattern: &'static str,
    label: &'static str,
    impact: &'static [(EmotionAxis, f32)],
) -> ActionPattern {
    ActionPattern { pattern, label, impact, polarity: Polarity::Negative }
}

/// Bonding patterns, in evaluation order.
pub static POSITIVE_PATTERNS: &[ActionPattern] = &[
    // Healing/helping actions
    pos(r"cast(?:ing)?\s+cure\s+wounds", "cast healing magic", &[(Trust, 0.4), (Intimacy, 0.2)]),
    pos(r"cast(?:ing)?\s+(?:a\s+)?healing\s+spell", "cast healing magic", &[(Trust, 0.3), (Intimacy, 0.1)]),
    pos(r"offered?\s+reassurance", "offered reassurance", &[(Trust, 0.2), (Intimacy, 0.1)]),
    pos(r"offered?\s+(?:cautious\s+)?support", "offered support", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"offered?\s+counsel", "offered counsel", &[(Trust, 0.2), (Respect, 0.2)]),
    pos(r"expressed?\s+(?:concern|worry)", "expressed concern", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"tended?\s+(?:to\s+)?wounds?", "tended wounds", &[(Trust, 0.3), (Intimacy, 0.2)]),
    pos(r"comforted", "provided comfort", &[(Intimacy, 0.3), (Trust, 0.1)]),
    // Combat cooperation
    pos(r"cast(?:ing)?\s+sacred\s+flame", "used divine power", &[(Trust, 0.2), (Respect, 0.2), (Power, 0.1)]),
    pos(r"(?:took|taking)\s+(?:the\s+)?lead", "took the lead", &[(Power, 0.2), (Respect, 0.1)]),
    pos(r"(?:took|assumed)\s+point", "took point", &[(Power, 0.2), (Respect, 0.1)]),
    pos(r"keen\s+eyes?\s+(?:scanning|surveying|watching)", "kept watch", &[(Trust, 0.1), (Respect, 0.1)]),
    pos(r"kept?\s+watch", "kept watch", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"stood?\s+guard", "stood guard", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"protected?\s+(?:from|against)", "provided protection", &[(Trust, 0.5), (Respect, 0.3)]),
    pos(r"defended", "defended ally", &[(Trust, 0.3), (Respect, 0.2)]),
    pos(r"stood\s+(?:between|against)", "stood between danger", &[(Trust, 0.4), (Respect, 0.3)]),
    pos(r"fought\s+(?:alongside|together)", "worked together", &[(Trust, 0.3), (Respect, 0.2)]),
    // Positive social bonds
    pos(r"bond\s+(?:deepened|strengthened)", "deepened bond", &[(Intimacy, 0.2), (Trust, 0.2)]),
    pos(r"shared?\s+(?:tales?|stories|experiences?)", "shared stories", &[(Intimacy, 0.3), (Trust, 0.1)]),
    pos(r"(?:built|earned|won)\s+trust", "built trust", &[(Trust, 0.3), (Respect, 0.1)]),
    pos(r"camaraderie", "shared camaraderie", &[(Trust, 0.2), (Intimacy, 0.2)]),
    pos(r"(?:unity|unified|united)", "showed unity", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"shared?\s+(?:purpose|resolve|determination)", "shared purpose", &[(Trust, 0.2), (Respect, 0.2)]),
    pos(r"renewed?\s+hope", "renewed hope", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"shared?\s+(?:a\s+)?moments?", "shared a moment", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"laughed?\s+together", "worked together", &[(Intimacy, 0.2), (Trust, 0.1)]),
    // Resource sharing
    pos(r"(?:gave|offered|provided)\s+(?:supplies|equipment|tools?)", "provided supplies", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"refused?\s+(?:any\s+)?payment", "refused payment", &[(Respect, 0.3), (Trust, 0.2)]),
    pos(r"(?:generous|generosity)", "showed generosity", &[(Respect, 0.2), (Trust, 0.2)]),
    pos(r"(?:shared|split)\s+(?:treasure|loot|rewards?)", "shared treasure", &[(Trust, 0.2), (Respect, 0.2)]),
    pos(r"(?:gave|offered)\s+(?:their\s+)?rations?", "gave rations", &[(Trust, 0.3), (Respect, 0.2)]),
    // Leadership/decision actions
    pos(r"(?:gave|issued)\s+orders?", "gave orders", &[(Power, 0.2)]),
    pos(r"followed?\s+(?:advice|suggestion|lead)", "followed advice", &[(Power, -0.1), (Respect, 0.2)]),
    pos(r"(?:took|assumed)\s+(?:command|leadership)", "took command", &[(Power, 0.3), (Respect, 0.2)]),
    pos(r"deferred?\s+to", "deferred to ally", &[(Power, -0.2), (Respect, 0.3)]),
    pos(r"valued?\s+(?:opinion|counsel)", "valued counsel", &[(Respect, 0.3), (Trust, 0.1)]),
    // Trust building
    pos(r"kept?\s+(?:a\s+)?promise", "kept a promise", &[(Trust, 0.3), (Respect, 0.2)]),
    pos(r"(?:proved|proven)\s+(?:reliable|trustworthy)", "built trust", &[(Trust, 0.4), (Respect, 0.2)]),
    pos(r"(?:confided|confessed)", "admitted vulnerability", &[(Intimacy, 0.3), (Trust, 0.2)]),
    pos(r"shared?\s+(?:a\s+)?secrets?", "shared secret", &[(Intimacy, 0.4), (Trust, 0.2)]),
    // Danger/sacrifice
    pos(r"(?:risked|sacrificed)\s+(?:for|to\s+protect)", "made sacrifice", &[(Trust, 0.5), (Respect, 0.4), (Intimacy, 0.2)]),
    pos(r"took\s+(?:the\s+)?(?:blow|hit|damage)\s+(?:for|instead)", "took the blow", &[(Trust, 0.6), (Respect, 0.4), (Intimacy, 0.3)]),
    pos(r"(?:saved|rescued)\s+(?:from|when)", "performed rescue", &[(Trust, 0.6), (Respect, 0.5), (Intimacy, 0.3)]),
    // Working together
    pos(r"together,?\s+(?:we|they)\s+(?:examined|investigated|searched)", "worked together", &[(Trust, 0.2), (Intimacy, 0.1)]),
    pos(r"(?:we|they)\s+(?:worked|acted)\s+together", "worked together", &[(Trust, 0.2), (Respect, 0.1)]),
    pos(r"prepared?\s+to\s+(?:report|return)\s+(?:back\s+)?together", "worked together", &[(Trust, 0.1), (Respect, 0.1)]),
    pos(r"(?:collaborated|cooperated)", "collaborated", &[(Trust, 0.2), (Respect, 0.2)]),
    // Romantic/intimate actions
    pos(r"passionate\s+kiss", "shared passionate kiss", &[(Intimacy, 0.7), (Trust, 0.3), (Respect, 0.1)]),
    pos(r"(?:gentle|tender|soft)\s+kiss", "shared kiss", &[(Intimacy, 0.5), (Trust, 0.2)]),
    pos(r"embraced?\s+(?:tenderly|gently|warmly)", "embraced warmly", &[(Intimacy, 0.4), (Trust, 0.2)]),
    pos(r"held?\s+(?:hands|close)", "held close", &[(Intimacy, 0.3), (Trust, 0.2)]),
    pos(r"(?:brief\s+)?intimate\s+dance", "danced together", &[(Intimacy, 0.5), (Trust, 0.3)]),
    pos(r"whispered?\s+(?:softly|gently)", "whispered softly", &[(Intimacy, 0.3), (Trust, 0.1)]),
    pos(r"gazed?\s+(?:into\s+eyes|longingly)", "gazed longingly", &[(Intimacy, 0.3), (Trust, 0.1)]),
    pos(r"romantic\s+(?:gesture|moment)", "romantic moment", &[(Intimacy, 0.4), (Trust, 0.2)]),
    pos(r"(?:showed|expressed)\s+(?:deep\s+)?affection", "showed affection", &[(Intimacy, 0.4), (Trust, 0.2)]),
    // Combat excellence
    pos(r"(?:landed|struck)\s+(?:a\s+)?(?:critical|devastating)\s+(?:hit|blow)", "critical strike", &[(Respect, 0.4), (Power, 0.3)]),
    pos(r"(?:heroically|bravely)\s+(?:charged|attacked)", "heroic charge", &[(Respect, 0.3), (Power, 0.2), (Trust, 0.2)]),
    pos(r"(?:expertly|skillfully)\s+(?:dodged|parried|blocked)", "expert defense", &[(Respect, 0.3), (Power, 0.1)]),
    pos(r"(?:flanked|outmaneuvered)\s+(?:the\s+)?(?:enemy|opponent)", "tactical maneuver", &[(Respect, 0.2), (Trust, 0.2)]),
    pos(r"(?:coordinated|synchronized)\s+(?:attack|strike)", "coordinated attack", &[(Trust, 0.3), (Respect, 0.2)]),
    pos(r"(?:covered|watched)\s+(?:my|their|our)\s+(?:back|flank)", "kept watch", &[(Trust, 0.4), (Respect, 0.2)]),
    pos(r"(?:drew|attracted)\s+(?:enemy\s+)?fire", "drew enemy fire", &[(Trust, 0.3), (Respect, 0.3)]),
    pos(r"last\s+stand", "last stand", &[(Respect, 0.5), (Trust, 0.4), (Power, 0.2)]),
    // Humor and levity
    pos(r"(?:shared|exchanged)\s+(?:a\s+)?(?:joke|jest|laugh)", "shared laughter", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"(?:made|cracked)\s+(?:a\s+)?(?:joke|jest)", "shared laughter", &[(Intimacy, 0.1), (Trust, 0.1)]),
    pos(r"(?:laughed|chuckled)\s+(?:together|heartily)", "worked together", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"(?:lightened|lifted)\s+(?:the\s+)?mood", "lightened the mood", &[(Intimacy, 0.1), (Trust, 0.1)]),
    pos(r"(?:playful|teasing)\s+(?:banter|exchange)", "playful banter", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"(?:amusing|humorous)\s+(?:comment|observation)", "amusing observation", &[(Intimacy, 0.1)]),
    // Deep loyalty
    pos(r"(?:swore|pledged)\s+(?:an\s+)?oath", "pledged oath", &[(Trust, 0.5), (Respect, 0.4)]),
    pos(r"(?:proved|demonstrated)\s+(?:unwavering\s+)?loyalty", "proved loyalty", &[(Trust, 0.5), (Respect, 0.3)]),
    pos(r"(?:refused|rejected)\s+(?:to\s+)?(?:abandon|leave)", "refused to abandon", &[(Trust, 0.4), (Respect, 0.3)]),
    pos(r"(?:stood|remained)\s+(?:by|with)\s+(?:through|despite)", "stood by ally", &[(Trust, 0.4), (Respect, 0.2)]),
    pos(r"(?:kept|honored)\s+(?:their\s+)?word", "kept their word", &[(Trust, 0.4), (Respect, 0.3)]),
    pos(r"(?:never|not)\s+(?:gave\s+up|surrendered)", "never gave up", &[(Respect, 0.3), (Trust, 0.2)]),
    // Strategic brilliance
    pos(r"(?:devised|formulated)\s+(?:a\s+)?(?:clever|brilliant)\s+(?:plan|strategy)", "devised strategy", &[(Respect, 0.4), (Power, 0.2)]),
    pos(r"(?:outsmarted|outwitted)", "outsmarted enemy", &[(Respect, 0.3), (Power, 0.2)]),
    pos(r"(?:spotted|detected)\s+(?:a\s+)?(?:trap|ambush)", "detected danger", &[(Trust, 0.3), (Respect, 0.2)]),
    pos(r"(?:found|discovered)\s+(?:a\s+)?(?:hidden|secret)", "discovered secret", &[(Respect, 0.2), (Trust, 0.1)]),
    pos(r"(?:solved|deciphered)\s+(?:the\s+)?(?:puzzle|riddle)", "solved puzzle", &[(Respect, 0.3), (Power, 0.1)]),
    pos(r"tactical\s+(?:advantage|insight)", "tactical insight", &[(Respect, 0.3), (Power, 0.2)]),
    // Emotional support
    pos(r"(?:comforted|consoled)\s+(?:in|during)\s+(?:grief|sorrow|pain)", "provided comfort", &[(Intimacy, 0.4), (Trust, 0.3)]),
    pos(r"(?:offered|provided)\s+(?:a\s+)?shoulder\s+to\s+cry", "offered a shoulder", &[(Intimacy, 0.4), (Trust, 0.2)]),
    pos(r"(?:listened|heard)\s+(?:patiently|carefully)", "listened patiently", &[(Intimacy, 0.2), (Trust, 0.2), (Respect, 0.1)]),
    pos(r"(?:understood|empathized)", "showed empathy", &[(Intimacy, 0.3), (Trust, 0.2)]),
    pos(r"(?:encouraged|inspired)\s+(?:when|during)", "offered encouragement", &[(Trust, 0.2), (Respect, 0.2)]),
    pos(r"(?:believed|had\s+faith)\s+(?:in|when)", "had faith", &[(Trust, 0.3), (Respect, 0.2)]),
    // Vulnerability and honesty
    pos(r"(?:revealed|shared)\s+(?:a\s+)?(?:painful|dark)\s+(?:past|secret)", "shared secret", &[(Intimacy, 0.5), (Trust, 0.4)]),
    pos(r"(?:admitted|confessed)\s+(?:weakness|fear|mistake)", "admitted vulnerability", &[(Intimacy, 0.3), (Trust, 0.3)]),
    pos(r"(?:opened\s+up|bared)\s+(?:soul|heart)", "opened up", &[(Intimacy, 0.5), (Trust, 0.3)]),
    pos(r"(?:cried|wept)\s+(?:openly|together)", "worked together", &[(Intimacy, 0.4), (Trust, 0.2)]),
    pos(r"(?:showed|revealed)\s+vulnerability", "showed vulnerability", &[(Intimacy, 0.4), (Trust, 0.3)]),
    // Teaching and mentoring
    pos(r"(?:taught|instructed)\s+(?:patiently|carefully)", "taught skills", &[(Respect, 0.3), (Trust, 0.2)]),
    pos(r"(?:guided|mentored)", "mentored ally", &[(Respect, 0.3), (Trust, 0.2), (Power, -0.1)]),
    pos(r"(?:shared|passed\s+on)\s+(?:knowledge|wisdom)", "shared wisdom", &[(Respect, 0.3), (Trust, 0.2)]),
    pos(r"(?:learned|trained)\s+(?:from|under)", "learned from ally", &[(Respect, 0.3), (Power, -0.2)]),
    // Celebration and joy
    pos(r"(?:celebrated|rejoiced)\s+(?:together|victory)", "worked together", &[(Intimacy, 0.2), (Trust, 0.2)]),
    pos(r"(?:toasted|cheered)\s+(?:to|for)", "raised a toast", &[(Intimacy, 0.2), (Trust, 0.1)]),
    pos(r"(?:sang|danced)\s+(?:together|around)", "danced together", &[(Intimacy, 0.3), (Trust, 0.1)]),
    pos(r"(?:shared|enjoyed)\s+(?:a\s+)?meal\s+together", "worked together", &[(Intimacy, 0.2), (Trust, 0.2)]),
    // Competition and rivalry
    pos(r"(?:friendly|good-natured)\s+(?:competition|rivalry)", "friendly rivalry", &[(Respect, 0.2), (Intimacy, 0.1)]),
    pos(r"(?:challenged|competed)\s+(?:fairly|honorably)", "friendly challenge", &[(Respect, 0.2)]),
    pos(r"(?:acknowledged|recognized)\s+(?:skill|superiority)", "acknowledged skill", &[(Respect, 0.3), (Power, -0.1)]),
    pos(r"(?:bested|defeated)\s+(?:in|at)\s+(?:fair|honorable)", "bested in fair contest", &[(Respect, 0.2), (Power, 0.2)]),
];

/// Damaging patterns, in evaluation order.
pub static NEGATIVE_PATTERNS: &[ActionPattern] = &[
    neg(r"(?:fled|abandoned)\s+(?:the\s+)?(?:scene|area|location|battle)", "abandoned in danger", &[(Trust, -0.5), (Respect, -0.3), (Fear, 0.2)]),
    neg(r"(?:betrayed|deceived)\s+(?:by|us)", "betrayed trust", &[(Trust, -0.6), (Respect, -0.4)]),
    neg(r"(?:was\s+)?threatened\s+by", "made threats", &[(Fear, 0.4), (Trust, -0.3)]),
    neg(r"(?:ignored|dismissed)\s+(?:our|their)\s+(?:concern|advice|plea)", "dismissed concerns", &[(Respect, -0.2), (Trust, -0.1)]),
    neg(r"(?:lied|deceived|misled)", "deceived ally", &[(Trust, -0.4), (Respect, -0.3)]),
    neg(r"broke\s+(?:a\s+)?promise", "broke a promise", &[(Trust, -0.4), (Respect, -0.3)]),
    neg(r"(?:stole|pilfered|took)\s+(?:from|without)", "stole from ally", &[(Trust, -0.3), (Respect, -0.2)]),
    neg(r"(?:mocked|ridiculed|belittled)", "mocked ally", &[(Respect, -0.3), (Intimacy, -0.2)]),
    neg(r"(?:argued|quarreled|fought)\s+(?:with|against)", "argued with ally", &[(Trust, -0.1), (Intimacy, -0.1)]),
    neg(r"(?:rejected|spurned|rebuffed)", "rejected ally", &[(Intimacy, -0.3), (Respect, -0.1)]),
    neg(r"(?:cruel|callous|heartless)", "showed cruelty", &[(Fear, 0.4), (Trust, -0.6), (Respect, -0.4)]),
    neg(r"(?:intimidated|frightened|scared)", "intimidated ally", &[(Fear, 0.5), (Trust, -0.3)]),
];

/// A catalogue entry compiled for matching.
pub struct CompiledPattern {
    /// Compiled case-insensitive matcher.
    pub regex: Regex,
    /// The source table entry.
    pub source: &'static ActionPattern,
}

static COMPILED: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
    POSITIVE_PATTERNS
        .iter()
        .chain(NEGATIVE_PATTERNS.iter())
        .filter_map(|spec| {
            Regex::new(&format!("(?i){}", spec.pattern))
                .ok()
                .map(|regex| CompiledPattern { regex, source: spec })
        })
        .collect()
});

/// The full compiled catalogue, positives first, in table order.
#[must_use]
pub fn compiled() -> &'static [CompiledPattern] {
    &COMPILED
}
