use crate::billing::{compute_breakdown, BillBreakdown, BillInput, RateTable, SimulationMode};

/// 한 번의 실행 동안만 유지되는 시뮬레이션 상태. 파일로 저장하지 않는다.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub input: BillInput,
    mode: SimulationMode,
    advice: Option<String>,
    exit_prompt_shown: bool,
}

impl Session {
    pub fn new(input: BillInput, mode: SimulationMode) -> Self {
        Self {
            input,
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// 전기/가스를 바꾼다. 이전 모드의 분석 결과는 버린다.
    pub fn set_mode(&mut self, mode: SimulationMode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "simulation mode changed");
        }
        self.mode = mode;
        self.advice = None;
    }

    /// 현재 입력/모드로 매번 새로 계산한다.
    pub fn breakdown(&self, rates: &RateTable) -> BillBreakdown {
        compute_breakdown(&self.input, self.mode, rates)
    }

    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    pub fn set_advice(&mut self, text: String) {
        self.advice = Some(text);
    }

    /// 종료 안내는 세션당 한 번만 띄운다. 처음 호출에서만 true.
    pub fn should_show_exit_prompt(&mut self) -> bool {
        !std::mem::replace(&mut self.exit_prompt_shown, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_mode_clears_advice() {
        let mut s = Session::default();
        s.set_advice("consiglio".into());
        s.set_mode(SimulationMode::Gas);
        assert_eq!(s.mode(), SimulationMode::Gas);
        assert!(s.advice().is_none());
    }

    #[test]
    fn exit_prompt_shows_once() {
        let mut s = Session::default();
        assert!(s.should_show_exit_prompt());
        assert!(!s.should_show_exit_prompt());
    }

    #[test]
    fn breakdown_follows_mode() {
        let rates = RateTable::default();
        let mut s = Session::new(BillInput::default(), SimulationMode::Luce);
        assert!(s.breakdown(&rates).canone_rai > 0.0);
        s.set_mode(SimulationMode::Gas);
        assert_eq!(s.breakdown(&rates).canone_rai, 0.0);
    }
}
