use crate::dataset::Era;

use super::encoding::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(in crate::app) enum RevealStep {
    Early,
    Middle,
    AllEras,
    Unlocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum RevealEffect {
    MergeEra(Era),
    UnlockEncodings,
    None,
}

impl RevealStep {
    pub(in crate::app) fn index(self) -> usize {
        match self {
            Self::Early => 0,
            Self::Middle => 1,
            Self::AllEras => 2,
            Self::Unlocked => 3,
        }
    }

    pub(in crate::app) fn advance(self) -> (Self, RevealEffect) {
        match self {
            Self::Early => (Self::Middle, RevealEffect::MergeEra(Era::Middle)),
            Self::Middle => (Self::AllEras, RevealEffect::MergeEra(Era::Recent)),
            Self::AllEras => (Self::Unlocked, RevealEffect::UnlockEncodings),
            Self::Unlocked => (Self::Unlocked, RevealEffect::None),
        }
    }

    pub(in crate::app) fn can_advance(self) -> bool {
        self != Self::Unlocked
    }

    pub(in crate::app) fn encodings_unlocked(self) -> bool {
        self == Self::Unlocked
    }

    pub(in crate::app) fn caption(self) -> &'static [&'static str] {
        match self {
            Self::Early => &[
                "Showing early anime (pre-1996)",
                "Pre-internet, reliant on physical distribution",
            ],
            Self::Middle => &[
                "+ 1996–2012 era",
                "Rise of internet usage and video sharing",
            ],
            Self::AllEras => &[
                "+ 2013–2025 era",
                "Online streaming boom",
                "Use color buttons to explore additional filtering",
            ],
            Self::Unlocked => &[
                "All data loaded",
                "Choose additional filtering methods",
            ],
        }
    }

    pub(in crate::app) fn advance_label(self) -> &'static str {
        match self {
            Self::Early => "Currently showing: pre-1996\nClick to add 1996–2012",
            Self::Middle => "Currently showing: pre-2012\nClick to add 2013–2025",
            Self::AllEras => "Currently showing: all eras\nClick to reveal color options",
            Self::Unlocked => "All data loaded",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Action {
    Advance,
    SetMode(ColorMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Effect {
    MergeEra(Era),
    UnlockEncodings,
    Recolor(ColorMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct ChartState {
    pub(in crate::app) step: RevealStep,
    pub(in crate::app) mode: ColorMode,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            step: RevealStep::Early,
            mode: ColorMode::Genre,
        }
    }
}

impl ChartState {
    /// Pure transition. Mode switches are ignored until the encoding controls
    /// have been unlocked.
    pub(in crate::app) fn apply(self, action: Action) -> (Self, Option<Effect>) {
        match action {
            Action::Advance => {
                let (step, effect) = self.step.advance();
                let effect = match effect {
                    RevealEffect::MergeEra(era) => Some(Effect::MergeEra(era)),
                    RevealEffect::UnlockEncodings => Some(Effect::UnlockEncodings),
                    RevealEffect::None => None,
                };
                (Self { step, ..self }, effect)
            }
            Action::SetMode(mode) if self.step.encodings_unlocked() => {
                (Self { mode, ..self }, Some(Effect::Recolor(mode)))
            }
            Action::SetMode(_) => (self, None),
        }
    }
}
