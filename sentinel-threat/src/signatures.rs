//! Tabela de assinaturas de ameaça
//!
//! Cada assinatura é uma conjunção de critérios com limites inclusivos.
//! A tabela é ordenada por prioridade decrescente: a primeira assinatura
//! que casa decide a classificação, então janelas sobrepostas são
//! resolvidas apenas pela posição na tabela.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::SensorSnapshot;

/// Canal de leitura do nó sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Iaq,
    Voc,
    Co2,
    Temperature,
    Humidity,
    GasResistance,
    Pm1,
    Pm25,
    Pm10,
}

impl Channel {
    /// Lê o valor do canal na leitura
    pub fn read(&self, snapshot: &SensorSnapshot) -> f32 {
        match self {
            Channel::Iaq => snapshot.iaq,
            Channel::Voc => snapshot.voc,
            Channel::Co2 => snapshot.co2,
            Channel::Temperature => snapshot.temperature,
            Channel::Humidity => snapshot.humidity,
            Channel::GasResistance => snapshot.gas_resistance,
            Channel::Pm1 => snapshot.pm1,
            Channel::Pm25 => snapshot.pm25,
            Channel::Pm10 => snapshot.pm10,
        }
    }

    /// Rótulo usado no texto da assinatura
    pub fn tag(&self) -> &'static str {
        match self {
            Channel::Iaq => "IAQ",
            Channel::Voc => "VOC",
            Channel::Co2 => "CO2",
            Channel::Temperature => "TEMP",
            Channel::Humidity => "HUM",
            Channel::GasResistance => "GasRes",
            Channel::Pm1 => "PM1",
            Channel::Pm25 => "PM2.5",
            Channel::Pm10 => "PM10",
        }
    }

    /// Casas decimais no texto da assinatura
    pub fn precision(&self) -> usize {
        match self {
            Channel::Voc => 3,
            Channel::GasResistance => 0,
            _ => 1,
        }
    }

    pub fn format(&self, value: f32) -> String {
        format!("{:.*}", self.precision(), value)
    }
}

/// Intervalo fechado `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Intervalo sem limite inferior
    pub const fn at_most(max: f32) -> Self {
        Self {
            min: f32::NEG_INFINITY,
            max,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == f32::NEG_INFINITY {
            write!(f, "<= {}", self.max)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Referência para critérios de desvio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    Fixed(f32),
    /// Linha de base de VOC observada nesta chamada
    VocBaseline,
}

impl Reference {
    fn resolve(&self, voc_baseline: f32) -> f32 {
        match self {
            Reference::Fixed(value) => *value,
            Reference::VocBaseline => voc_baseline,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Fixed(value) => write!(f, "{}", value),
            Reference::VocBaseline => write!(f, "baseline"),
        }
    }
}

/// Critério atômico de uma assinatura
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    /// Canal dentro do intervalo fechado
    Within(Channel, Interval),
    /// `|canal - referência| > limite`
    DeviatesMoreThan {
        channel: Channel,
        reference: Reference,
        limit: f32,
    },
    /// `|canal - referência| < limite`
    DeviatesLessThan {
        channel: Channel,
        reference: Reference,
        limit: f32,
    },
}

impl Criterion {
    pub fn holds(&self, snapshot: &SensorSnapshot, voc_baseline: f32) -> bool {
        match self {
            Criterion::Within(channel, interval) => interval.contains(channel.read(snapshot)),
            Criterion::DeviatesMoreThan {
                channel,
                reference,
                limit,
            } => (channel.read(snapshot) - reference.resolve(voc_baseline)).abs() > *limit,
            Criterion::DeviatesLessThan {
                channel,
                reference,
                limit,
            } => (channel.read(snapshot) - reference.resolve(voc_baseline)).abs() < *limit,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Within(channel, interval) => write!(f, "{} {}", channel.tag(), interval),
            Criterion::DeviatesMoreThan {
                channel,
                reference,
                limit,
            } => write!(f, "|{} - {}| > {}", channel.tag(), reference, limit),
            Criterion::DeviatesLessThan {
                channel,
                reference,
                limit,
            } => write!(f, "|{} - {}| < {}", channel.tag(), reference, limit),
        }
    }
}

/// Modelo de texto: `LABEL_TAG:valor_TAG:valor...SUFFIX`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureTemplate {
    pub label: &'static str,
    pub fields: &'static [Channel],
    pub suffix: &'static str,
}

impl SignatureTemplate {
    pub fn render(&self, snapshot: &SensorSnapshot) -> String {
        let mut text = String::from(self.label);
        for channel in self.fields {
            text.push('_');
            text.push_str(channel.tag());
            text.push(':');
            text.push_str(&channel.format(channel.read(snapshot)));
        }
        text.push_str(self.suffix);
        text
    }
}

/// Como a assinatura se reporta quando casa
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// Ameaça com texto montado a partir do modelo
    Template(SignatureTemplate),
    /// Portador de GLP: ameaça só se o VOC se afasta da linha de base
    LpgCarrier { deviation_limit: f32 },
}

/// Assinaturas conhecidas, em ordem de prioridade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    LethalOpioidWeapon,
    ChemicalWeaponCocktail,
    NeurotoxinAttack,
    HeavyMetals,
    Organophosphates,
    GaseousWeapon,
    Opioids,
    Scopolamine,
    BitterKnockout,
    StealthChemical,
    IaqAnomaly,
    LpgCarrier,
}

impl ThreatKind {
    /// Entrada correspondente na tabela
    pub fn signature(&self) -> &'static ThreatSignature {
        // A ordem das variantes segue a ordem da tabela
        &SIGNATURES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.signature().name
    }

    pub fn priority(&self) -> u8 {
        self.signature().priority
    }
}

/// Uma assinatura da tabela
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatSignature {
    pub kind: ThreatKind,
    pub name: &'static str,
    /// 1 = mais alta
    pub priority: u8,
    pub criteria: &'static [Criterion],
    pub report: Report,
}

impl ThreatSignature {
    /// Todos os critérios valem (conjunção)
    pub fn matches(&self, snapshot: &SensorSnapshot, voc_baseline: f32) -> bool {
        self.criteria
            .iter()
            .all(|criterion| criterion.holds(snapshot, voc_baseline))
    }
}

const fn within(channel: Channel, min: f32, max: f32) -> Criterion {
    Criterion::Within(channel, Interval::new(min, max))
}

const fn template(
    label: &'static str,
    fields: &'static [Channel],
    suffix: &'static str,
) -> Report {
    Report::Template(SignatureTemplate {
        label,
        fields,
        suffix,
    })
}

use Channel::{GasResistance, Humidity, Iaq, Pm25, Temperature, Voc};

/// Tabela fixa, ordenada por prioridade decrescente
pub static SIGNATURES: [ThreatSignature; 12] = [
    ThreatSignature {
        kind: ThreatKind::LethalOpioidWeapon,
        name: "Lethal opioid weapon",
        priority: 1,
        criteria: &[
            within(Voc, 0.60, 0.70),
            within(Iaq, 70.0, 80.0),
            within(Pm25, 20.0, 30.0),
        ],
        report: template("LETHAL_OPIOID_WEAPON", &[Voc, Iaq], "_EVACUATE"),
    },
    ThreatSignature {
        kind: ThreatKind::ChemicalWeaponCocktail,
        name: "Chemical weapon cocktail",
        priority: 2,
        criteria: &[
            within(Voc, 0.55, 0.65),
            within(Iaq, 60.0, 70.0),
            within(Pm25, 22.0, 32.0),
        ],
        report: template("CHEMICAL_WEAPON_COCKTAIL", &[Voc, Iaq, Pm25], ""),
    },
    ThreatSignature {
        kind: ThreatKind::NeurotoxinAttack,
        name: "Neurotoxin attack",
        priority: 3,
        criteria: &[
            within(Voc, 0.52, 0.58),
            within(Iaq, 54.0, 62.0),
            within(Pm25, 25.0, 35.0),
            within(Humidity, 76.0, 82.0),
        ],
        report: template("NEUROTOXIN_ATTACK", &[Voc, Iaq], "_FOOT_TARGETING"),
    },
    ThreatSignature {
        kind: ThreatKind::HeavyMetals,
        name: "Heavy metals",
        priority: 4,
        criteria: &[
            within(Voc, 0.53, 0.58),
            within(Iaq, 54.0, 62.0),
            within(Pm25, 25.0, 35.0),
        ],
        report: template("HEAVY_METAL_ATTACK", &[Voc, Iaq, Pm25], ""),
    },
    ThreatSignature {
        kind: ThreatKind::Organophosphates,
        name: "Organophosphates",
        priority: 5,
        criteria: &[
            within(Voc, 0.52, 0.57),
            within(Iaq, 53.0, 61.0),
            within(Humidity, 76.0, 83.0),
        ],
        report: template("ORGANOPHOSPHATE_ATTACK", &[Voc, Iaq, Humidity], ""),
    },
    // Ausência de partículas faz parte da assinatura (entrega só gasosa)
    ThreatSignature {
        kind: ThreatKind::GaseousWeapon,
        name: "Gaseous weapon",
        priority: 6,
        criteria: &[
            within(Iaq, 55.0, 70.0),
            within(Voc, 0.5, 0.7),
            Criterion::Within(Pm25, Interval::at_most(2.0)),
            within(Humidity, 75.0, 85.0),
        ],
        report: template("GASEOUS_CHEMICAL_WEAPON", &[Iaq, Voc, Pm25], ""),
    },
    ThreatSignature {
        kind: ThreatKind::Opioids,
        name: "Opioids",
        priority: 7,
        criteria: &[
            within(Voc, 0.58, 0.68),
            within(Iaq, 65.0, 75.0),
            within(Pm25, 20.0, 30.0),
        ],
        report: template("OPIOID_ATTACK", &[Voc, Iaq, Pm25], ""),
    },
    ThreatSignature {
        kind: ThreatKind::Scopolamine,
        name: "Scopolamine",
        priority: 8,
        criteria: &[
            within(Voc, 0.495, 0.515),
            within(Iaq, 49.5, 55.5),
            within(Pm25, 2.0, 9.0),
            within(Humidity, 78.0, 84.0),
            within(Temperature, 29.0, 32.0),
        ],
        report: template("SCOPOLAMINE_DELIVERY", &[Iaq, Voc, Pm25], ""),
    },
    ThreatSignature {
        kind: ThreatKind::BitterKnockout,
        name: "Bitter knockout drug",
        priority: 9,
        criteria: &[
            within(Voc, 0.50, 0.55),
            within(Iaq, 50.0, 58.0),
            within(GasResistance, 5595.0, 5605.0),
        ],
        report: template("BITTER_KNOCKOUT_DRUG", &[Voc, Iaq], ""),
    },
    ThreatSignature {
        kind: ThreatKind::StealthChemical,
        name: "Stealth chemical attack",
        priority: 10,
        criteria: &[
            within(GasResistance, 5580.0, 5620.0),
            within(Humidity, 70.0, 90.0),
            within(Temperature, 28.0, 35.0),
            within(Iaq, 45.0, 85.0),
        ],
        report: template("STEALTH_CHEMICAL", &[Iaq, Humidity, Temperature], ""),
    },
    // Deterioração do índice sem deriva de VOC que a explique
    ThreatSignature {
        kind: ThreatKind::IaqAnomaly,
        name: "IAQ anomaly without VOC correlate",
        priority: 11,
        criteria: &[
            Criterion::DeviatesMoreThan {
                channel: Iaq,
                reference: Reference::Fixed(50.0),
                limit: 8.0,
            },
            Criterion::DeviatesLessThan {
                channel: Voc,
                reference: Reference::VocBaseline,
                limit: 0.010,
            },
        ],
        report: template("IAQ_ANOMALY_NO_VOC", &[Iaq, Voc], ""),
    },
    ThreatSignature {
        kind: ThreatKind::LpgCarrier,
        name: "LPG carrier / concealed delivery",
        priority: 12,
        criteria: &[within(GasResistance, 5595.0, 5605.0)],
        report: Report::LpgCarrier {
            deviation_limit: 0.005,
        },
    },
];

/// Tabela completa, em ordem de prioridade
pub fn signatures() -> &'static [ThreatSignature] {
    &SIGNATURES
}

/// Primeira assinatura que casa com a leitura
pub fn first_match(snapshot: &SensorSnapshot, voc_baseline: f32) -> Option<&'static ThreatSignature> {
    SIGNATURES
        .iter()
        .find(|sig| sig.matches(snapshot, voc_baseline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_priority_ordered() {
        for (i, sig) in SIGNATURES.iter().enumerate() {
            assert_eq!(sig.priority as usize, i + 1);
            assert_eq!(sig.kind as usize, i);
        }
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(ThreatKind::Scopolamine.priority(), 8);
        assert_eq!(ThreatKind::LpgCarrier.name(), "LPG carrier / concealed delivery");
    }

    #[test]
    fn test_interval_inclusive() {
        let interval = Interval::new(0.495, 0.515);
        assert!(interval.contains(0.495));
        assert!(interval.contains(0.515));
        assert!(!interval.contains(0.494));
        assert!(!interval.contains(0.516));
    }

    #[test]
    fn test_interval_at_most() {
        let interval = Interval::at_most(2.0);
        assert!(interval.contains(2.0));
        assert!(interval.contains(-5.0));
        assert!(!interval.contains(2.01));
    }

    #[test]
    fn test_criterion_display() {
        let gaseous = ThreatKind::GaseousWeapon.signature();
        let described: Vec<String> = gaseous.criteria.iter().map(|c| c.to_string()).collect();
        assert_eq!(described[0], "IAQ [55, 70]");
        assert_eq!(described[2], "PM2.5 <= 2");

        let anomaly = ThreatKind::IaqAnomaly.signature();
        assert_eq!(anomaly.criteria[1].to_string(), "|VOC - baseline| < 0.01");
    }

    #[test]
    fn test_channel_precision() {
        assert_eq!(Channel::Voc.format(0.5), "0.500");
        assert_eq!(Channel::Iaq.format(52.04), "52.0");
        assert_eq!(Channel::GasResistance.format(5600.2), "5600");
        assert_eq!(Channel::Pm25.tag(), "PM2.5");
    }

    #[test]
    fn test_template_render() {
        let mut snapshot = SensorSnapshot::clean_air();
        snapshot.voc = 0.65;
        snapshot.iaq = 75.0;

        let tpl = SignatureTemplate {
            label: "LETHAL_OPIOID_WEAPON",
            fields: &[Channel::Voc, Channel::Iaq],
            suffix: "_EVACUATE",
        };
        assert_eq!(
            tpl.render(&snapshot),
            "LETHAL_OPIOID_WEAPON_VOC:0.650_IAQ:75.0_EVACUATE"
        );
    }

    #[test]
    fn test_deviation_criteria() {
        let mut snapshot = SensorSnapshot::clean_air();
        snapshot.iaq = 40.0;
        snapshot.voc = 0.505;

        let anomaly = ThreatKind::IaqAnomaly.signature();
        assert!(anomaly.matches(&snapshot, 0.5));

        // |voc - baseline| = 0.02, explicado pela deriva de VOC
        assert!(!anomaly.matches(&snapshot, 0.485));

        snapshot.iaq = 58.0;
        assert!(!anomaly.matches(&snapshot, 0.5));
    }

    #[test]
    fn test_first_match_clean_air() {
        let snapshot = SensorSnapshot::clean_air();
        // IAQ 25 está a 25 de 50, mas VOC 0.3 se afasta da base 0.5
        assert!(first_match(&snapshot, 0.5).is_none());
    }
}
