//! Flattened chart view handed to text generation, and the canned fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chart::ChartDerived;
use crate::error::AstrotError;
use crate::zodiac::{Body, Element, House, Modality, Sign};

/// `12.5` -> `12°30'`. Minutes are truncated, never rounded up to 60.
pub fn format_degree(degree: f64) -> String {
    let whole = degree.floor();
    let minutes = ((degree - whole) * 60.0).floor().clamp(0.0, 59.0);
    format!("{}°{:02}'", whole as i64, minutes as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInHouse {
    pub sign: Sign,
    pub house: House,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBody {
    pub body: Body,
    pub sign: Sign,
    pub house: House,
}

/// What a text generator needs to know about a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub name: Option<String>,
    pub sun: SignInHouse,
    pub moon: SignInHouse,
    /// Sign of the ascendant
    pub ascendant: Sign,
    /// Every body other than the Sun and Moon, canonical order
    pub planets: Vec<PlacedBody>,
    pub dominant_element: Option<Element>,
    pub dominant_modality: Option<Modality>,
}

impl ChartSummary {
    pub fn from_chart(name: Option<&str>, chart: &ChartDerived) -> Result<Self, AstrotError> {
        let pick = |body: Body| {
            chart
                .body(body)
                .map(|p| SignInHouse {
                    sign: p.sign,
                    house: p.house,
                })
                .ok_or_else(|| AstrotError::InvalidInput(format!("chart has no {} position", body)))
        };

        Ok(Self {
            name: name.map(str::to_string),
            sun: pick(Body::Sun)?,
            moon: pick(Body::Moon)?,
            ascendant: chart.rising_sign(),
            planets: chart
                .bodies
                .iter()
                .filter(|p| !matches!(p.body, Body::Sun | Body::Moon))
                .map(|p| PlacedBody {
                    body: p.body,
                    sign: p.sign,
                    house: p.house,
                })
                .collect(),
            dominant_element: chart.elements.dominant(),
            dominant_modality: chart.modalities.dominant(),
        })
    }

    /// One line per placement, e.g. `Sun: Gemini, 10th House`.
    pub fn placement_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Sun: {}, {}", self.sun.sign, self.sun.house.name()),
            format!("Moon: {}, {}", self.moon.sign, self.moon.house.name()),
            format!("Ascendant: {}", self.ascendant),
        ];
        lines.extend(
            self.planets
                .iter()
                .map(|p| format!("{}: {}, {}", p.body, p.sign, p.house.name())),
        );
        lines
    }

    /// Placement of a body other than the Sun and Moon.
    pub fn planet(&self, body: Body) -> Option<&PlacedBody> {
        self.planets.iter().find(|p| p.body == body)
    }
}

/// Picks the phrase for `element` from `[fire, earth, air, water]`.
fn by_element(element: Element, phrases: [&'static str; 4]) -> &'static str {
    match element {
        Element::Fire => phrases[0],
        Element::Earth => phrases[1],
        Element::Air => phrases[2],
        Element::Water => phrases[3],
    }
}

/// Sectioned reading built from a summary without any text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInterpretation {
    pub sun_sign: String,
    pub moon_sign: String,
    pub rising_sign: String,
    pub big_three: String,
    pub personality: String,
    pub relationships: String,
    pub career: String,
    pub challenges: String,
    pub strengths: String,
    pub life_theme: String,
}

impl ChartInterpretation {
    pub fn from_summary(summary: &ChartSummary) -> Self {
        let sun = summary.sun.sign;
        let moon = summary.moon.sign;
        let rising = summary.ascendant;

        let sun_sign = format!(
            "{} With your Sun in the {}, this energy is focused on {}.",
            TemplateInterpreter::sun_sentence(sun),
            summary.sun.house.name(),
            summary.sun.house.theme().to_lowercase()
        );
        let moon_sign = format!(
            "Your Moon is in {}. {}",
            moon,
            TemplateInterpreter::moon_sentence(moon)
        );
        let rising_sign = format!(
            "Others see you through {} qualities first. You project {} energy and approach life in a {} way.",
            rising,
            rising.element(),
            rising.modality()
        );
        let big_three = format!(
            "Your {} Sun is expressed through your {} rising, while your {} Moon is the inner foundation. \
             Together they blend {}, {} and {} energies.",
            sun,
            rising,
            moon,
            sun.element(),
            moon.element(),
            rising.element()
        );

        let mut personality = String::from("Your personality is a blend of several placements.");
        if let Some(mercury) = summary.planet(Body::Mercury) {
            personality.push_str(&format!(
                " With Mercury in {} you are {} in the way you handle ideas.",
                mercury.sign,
                by_element(
                    mercury.sign.element(),
                    [
                        "direct and enthusiastic",
                        "practical and methodical",
                        "intellectual and social",
                        "intuitive and emotional",
                    ]
                )
            ));
        }
        if let Some(venus) = summary.planet(Body::Venus) {
            personality.push_str(&format!(
                " Your {} Venus values {}.",
                venus.sign,
                by_element(
                    venus.sign.element(),
                    [
                        "passion and excitement",
                        "stability and loyalty",
                        "intellectual connection and conversation",
                        "emotional depth and intuition",
                    ]
                )
            ));
        }

        let mut relationships = String::from("In relationships");
        match summary.planet(Body::Venus) {
            Some(venus) => relationships.push_str(&format!(
                " you are drawn to {} partners.",
                by_element(
                    venus.sign.element(),
                    [
                        "confident, adventurous",
                        "reliable, grounded",
                        "curious, talkative",
                        "sensitive, intuitive",
                    ]
                )
            )),
            None => relationships.push_str(" you look for partners who match your Sun."),
        }
        if let Some(mars) = summary.planet(Body::Mars) {
            relationships.push_str(&format!(
                " Your {} Mars handles desire and conflict in a {} way.",
                mars.sign,
                mars.sign.modality()
            ));
        }

        let mut career = format!(
            "Your {} Sun does best in work that uses its {} energy.",
            sun,
            sun.element()
        );
        if let Some(saturn) = summary.planet(Body::Saturn) {
            career.push_str(&format!(
                " With Saturn in {} in the {}, success comes through {}.",
                saturn.sign,
                saturn.house.name(),
                by_element(
                    saturn.sign.element(),
                    [
                        "leadership and initiative",
                        "practical, structured effort",
                        "communication and networking",
                        "emotional intelligence and intuition",
                    ]
                )
            ));
        }

        let mut challenges = String::from(
            "Every chart has its challenges, and yours are chances to grow.",
        );
        match summary.dominant_element {
            Some(element) => challenges.push_str(&format!(
                " With so much {} in your chart, watch for {}.",
                element,
                by_element(
                    element,
                    [
                        "impatience and burning out",
                        "stubbornness and resisting change",
                        "overthinking and keeping feelings at a distance",
                        "taking on other people's moods",
                    ]
                )
            )),
            None => challenges.push_str(
                " Your elements are evenly spread, so the work is choosing where to put your energy.",
            ),
        }

        let mut strengths = format!(
            "Your {} Sun gives you {} energy and a {} approach to life.",
            sun,
            sun.element(),
            sun.modality()
        );
        if let Some(jupiter) = summary.planet(Body::Jupiter) {
            strengths.push_str(&format!(
                " Jupiter in {} widens your gift for {}.",
                jupiter.sign,
                by_element(
                    jupiter.sign.element(),
                    [
                        "leadership and inspiration",
                        "practical wisdom and growth",
                        "learning and communication",
                        "intuition and compassion",
                    ]
                )
            ));
        }

        let mut life_theme = format!(
            "Your life theme is expressing your {} nature honestly.",
            sun
        );
        if let Some(node) = summary.planet(Body::NorthNode) {
            life_theme.push_str(&format!(
                " The North Node in {} points your growth toward {} qualities and a {} approach.",
                node.sign,
                node.sign.element(),
                node.sign.modality()
            ));
        }

        Self {
            sun_sign,
            moon_sign,
            rising_sign,
            big_three,
            personality,
            relationships,
            career,
            challenges,
            strengths,
            life_theme,
        }
    }
}

/// Turns a summary into prose. Model-backed implementations live outside
/// this crate.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, summary: &ChartSummary) -> anyhow::Result<String>;
}

/// Fixed sentences keyed by sign; used when no text model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateInterpreter;

impl TemplateInterpreter {
    fn sun_sentence(sign: Sign) -> &'static str {
        match sign {
            Sign::Aries => "You lead from the front and start things others only talk about.",
            Sign::Taurus => "You build slowly and keep what you build.",
            Sign::Gemini => "You connect people and ideas and need variety to stay sharp.",
            Sign::Cancer => "You protect the people you love and trust your instincts about them.",
            Sign::Leo => "You are at your best when your warmth and creativity have an audience.",
            Sign::Virgo => "You notice what needs fixing and quietly fix it.",
            Sign::Libra => "You look for balance and fairness in every exchange.",
            Sign::Scorpio => "You go deep, and you do not let go easily.",
            Sign::Sagittarius => "You chase meaning, distance and the next big question.",
            Sign::Capricorn => "You set long goals and climb toward them steadily.",
            Sign::Aquarius => "You think in systems and care about the group as much as the person.",
            Sign::Pisces => "You feel what others feel and turn it into imagination.",
        }
    }

    fn moon_sentence(sign: Sign) -> &'static str {
        match sign.element() {
            Element::Fire => "Emotionally you need movement, honesty and a bit of excitement.",
            Element::Earth => "Emotionally you settle through routine, comfort and tangible results.",
            Element::Air => "Emotionally you process things by talking them through.",
            Element::Water => "Emotionally you run deep and need real closeness to feel safe.",
        }
    }
}

#[async_trait]
impl Interpreter for TemplateInterpreter {
    async fn interpret(&self, summary: &ChartSummary) -> anyhow::Result<String> {
        let mut text = String::new();
        if let Some(name) = &summary.name {
            text.push_str(&format!("{}, ", name));
        }
        text.push_str(&format!(
            "your Sun is in {} in the {}. {} This energy is focused on {}.\n",
            summary.sun.sign,
            summary.sun.house.name(),
            Self::sun_sentence(summary.sun.sign),
            summary.sun.house.theme().to_lowercase()
        ));
        text.push_str(&format!(
            "Your Moon is in {}. {}\n",
            summary.moon.sign,
            Self::moon_sentence(summary.moon.sign)
        ));
        text.push_str(&format!(
            "With {} rising, others meet your {} side first and you approach life in a {} way.",
            summary.ascendant,
            summary.ascendant.element(),
            summary.ascendant.modality()
        ));
        if let Some(element) = summary.dominant_element {
            text.push_str(&format!("\nYour chart leans toward {}.", element));
        }
        Ok(text)
    }
}
