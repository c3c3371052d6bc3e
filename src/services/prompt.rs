//! System prompt and few-shot examples for the kiosk analysis model.
//!
//! The decision policy lives in this instruction text: the model must only
//! ever point at text that is really on screen, ask back when intent is
//! ambiguous, and phrase guidance for a listener who cannot see the screen.

use serde_json::{json, Value};

use crate::models::analyze::AnalyzeRequest;

pub const SYSTEM_PROMPT: &str = r#"[역할]
너는 시각 장애인 및 외국인을 위한 키오스크 보조 에이전트이다.
사용자는 키오스크 화면을 보지 못하거나, 화면의 언어를 이해하지 못할 수 있다.
너의 목표는 사용자가 원하는 메뉴를 실수 없이 주문하도록, 현재 화면에 있는
텍스트(버튼, 메뉴명 등) 중 어떤 것을 눌러야 하는지 안내하는 것이다.

[입력]
사용자 턴은 아래 필드를 가진 JSON 객체이다:
* `user_input`: 최신 사용자 발화 (STT 결과 문자열, 없을 수도 있음)
* `available_texts`: 현재 화면에서 OCR로 추출한 텍스트 문자열 배열
* `dialogue_history`: 지금까지의 대화 목록. 과거 맥락과 사용자의 의도를 이해할 때 참고한다.
* `last_btn`: 사용자가 직전에 눌렀던 버튼의 텍스트. 흐름 파악을 위한 힌트로만 사용하고, 출력에는 포함하지 않는다.

[출력 형식]
반드시 아래 JSON 스키마에 맞는 한 개의 JSON 객체만 출력해야 한다.

{
  "status": "success" | "ambiguous" | "fail",
  "confidence": number,
  "response_message": string,
  "action": {
    "type": "click_text" | "speak_only" | "ask_clarification",
    "params": {}
  }
}

* `status`
  * "success": 눌러야 할 버튼(텍스트)을 명확하게 하나로 결정했을 때
  * "ambiguous": 후보가 여러 개라서 사용자에게 다시 물어봐야 할 때
  * "fail": 현재 화면의 텍스트만으로는 적절한 버튼을 찾기 어려울 때
* `confidence`: 0.0 ~ 1.0 사이의 실수.
  * 명확한 선택: 0.9 이상
  * 모호하지만 어느 정도 추론 가능: 0.6 ~ 0.9
  * 거의 확신이 없거나 버튼이 없음: 0.0 ~ 0.6

[행동 규칙]
1. click_text (버튼 클릭 유도):
   * `action.params.target_text`에는 반드시 `available_texts` 배열 안에 실제로
     존재하는 문자열만 넣어야 한다. 새로운 메뉴 이름이나 화면에 없는 텍스트를 지어내지 마라.
   * 이 경우 `status`는 보통 "success"가 된다.
2. ask_clarification (모호할 때 되묻기):
   * 사용자의 말이 모호하거나, 여러 버튼이 후보일 때 사용한다.
   * `action.params.candidates` 배열에 사용자가 선택할 수 있는 버튼 텍스트
     (= `available_texts` 중 일부)를 넣는다. `status`는 "ambiguous"로 설정한다.
3. speak_only (버튼이 없을 때 설명만):
   * 현재 화면에 사용자가 원하는 메뉴나 동작에 해당하는 텍스트가 전혀 없을 때 사용한다.
   * `action.params`는 빈 객체 {}로 둔다.
   * 이때 `status`는 보통 "fail"이 되지만, 단순 안내(예: 결제 완료 화면에서
     "결제가 완료되었습니다" 안내만 할 때)는 "success"로 둘 수 있다.
4. 원하는 메뉴가 현재 화면에 없어도 해당 카테고리 버튼(예: 감자 튀김 → "사이드")이
   보이면, speak_only 대신 그 카테고리 버튼으로 click_text 안내를 우선한다.
5. response_message 작성 규칙:
   * 한국어, 공손체로 짧고 명확하게 말한다.
   * 시각 장애인을 상정하여 어디를 어떻게 누를지 구체적으로 안내한다.
     예: "~버튼으로 안내하겠습니다. 손가락을 움직이면서 진동이 가장 빨라졌을 때 버튼을 눌러주세요."
   * 외국인 사용자도 있을 수 있으므로, 메뉴 이름은 화면의 텍스트 그대로 읽어준다.
6. last_btn 활용:
   * 예: 이전에 "햄버거" 카테고리를 눌렀다면, 이후 "불고기버거" 등은 햄버거 메뉴일
     가능성이 높다. 의도 추론을 돕는 힌트일 뿐, 응답에 다시 포함하지 않는다.
7. 임의 선택 절대 금지:
   * 사용자가 선택을 확정하지 않았다면 click_text로 버튼을 골라 안내하지 말고
     무조건 ask_clarification으로 되물어라.

[최종 지시]
* 모든 응답은 위 [출력 형식]에 맞는 JSON 객체 한 개만 포함해야 한다.
* JSON 앞뒤에 어떤 설명, 마크다운, 자연어도 붙이면 안 된다.
* `target_text`와 `candidates`에 들어가는 값은 반드시 `available_texts` 배열에
  존재하는 문자열만 사용해야 한다.
* 확신이 없으면 과감하게 ask_clarification을 사용해 되물어라."#;

/// Chat messages as the completions API expects them: system prompt, three
/// few-shot pairs (one per action type), then the current turn.
pub fn build_messages(payload: &AnalyzeRequest) -> Vec<Value> {
    let mut messages = vec![json!({"role": "system", "content": SYSTEM_PROMPT})];

    for (user, assistant) in few_shot_examples() {
        messages.push(json!({"role": "user", "content": user.to_string()}));
        messages.push(json!({"role": "assistant", "content": assistant.to_string()}));
    }

    let user_payload = json!({
        "task": "analyze_kiosk",
        "session_id": payload.session_id,
        "user_input": payload.user_input.as_deref().unwrap_or(""),
        "available_texts": payload.ocr_texts,
        "dialogue_history": payload.dialogue_history,
        "last_btn": payload.last_btn,
    });
    messages.push(json!({"role": "user", "content": user_payload.to_string()}));
    messages
}

fn few_shot_examples() -> Vec<(Value, Value)> {
    vec![
        (
            json!({
                "task": "analyze_kiosk",
                "user_input": "소고기 들어간 걸로 줘",
                "available_texts": ["불고기 버거", "치즈 버거", "사이드", "음료"],
                "dialogue_history": [],
                "last_btn": null,
            }),
            json!({
                "status": "ambiguous",
                "confidence": 0.62,
                "response_message": "불고기 버거와 치즈 버거 중 어떤 것을 선택할까요?",
                "action": {
                    "type": "ask_clarification",
                    "params": {"candidates": ["불고기 버거", "치즈 버거"]},
                },
            }),
        ),
        (
            json!({
                "task": "analyze_kiosk",
                "user_input": "맥너겟 4조각으로 줘",
                "available_texts": ["후렌치 후라이 -미디엄", "맥너겟 4조각", "골든 모짜렐라 치즈스틱"],
                "dialogue_history": [],
                "last_btn": "세트 선택",
            }),
            json!({
                "status": "success",
                "confidence": 0.91,
                "response_message": "맥너겟 4조각 버튼으로 안내하겠습니다. 손가락을 움직이면 목표에 가까워질수록 진동이 빨라집니다.",
                "action": {"type": "click_text", "params": {"target_text": "맥너겟 4조각"}},
            }),
        ),
        (
            json!({
                "task": "analyze_kiosk",
                "user_input": "에스프레소 없어?",
                "available_texts": [
                    "코카콜라- 미디엄",
                    "스프라이트- 미디엄",
                    "환타 - 미디엄",
                    "코카콜라 제로 - 미디엄",
                    "아이스 아메리카노 - 미디엄",
                ],
                "dialogue_history": [],
                "last_btn": "디핑 소스 선택",
            }),
            json!({
                "status": "fail",
                "confidence": 0.44,
                "response_message": "에스프레소는 현재 화면에 없습니다. 보이는 음료 중에서 선택하시겠어요?",
                "action": {"type": "speak_only", "params": {}},
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_start_with_system_and_end_with_current_turn() {
        let req = AnalyzeRequest {
            session_id: "sess_001".to_string(),
            user_input: Some("불고기 버거 하나".to_string()),
            ocr_texts: vec!["추천메뉴".to_string(), "불고기버거".to_string()],
            dialogue_history: vec![],
            last_btn: Some("햄버거".to_string()),
        };
        let messages = build_messages(&req);

        // system + 3 user/assistant pairs + current turn
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[7]["role"], "user");

        let turn: Value =
            serde_json::from_str(messages[7]["content"].as_str().unwrap()).unwrap();
        assert_eq!(turn["task"], "analyze_kiosk");
        assert_eq!(turn["available_texts"][1], "불고기버거");
        assert_eq!(turn["last_btn"], "햄버거");
    }

    #[test]
    fn few_shot_covers_every_action_type() {
        let kinds: Vec<String> = few_shot_examples()
            .iter()
            .map(|(_, assistant)| assistant["action"]["type"].as_str().unwrap().to_string())
            .collect();
        assert!(kinds.contains(&"click_text".to_string()));
        assert!(kinds.contains(&"speak_only".to_string()));
        assert!(kinds.contains(&"ask_clarification".to_string()));
    }
}
