use dokan_core::commerce::{DeliveryFees, PriceBreakdown};
use dokan_core::domain::order::OrderDraft;
use dokan_core::domain::product::Product;
use dokan_core::lexicon::SalutationLabels;

use crate::router::{Intent, Routed, SmallTalkCategory};

#[derive(Clone, Debug)]
pub struct ResponseComposer {
    shop_name: String,
    currency_symbol: String,
    labels: SalutationLabels,
    fees: DeliveryFees,
}

impl ResponseComposer {
    pub fn new(
        shop_name: impl Into<String>,
        currency_symbol: impl Into<String>,
        labels: SalutationLabels,
        fees: DeliveryFees,
    ) -> Self {
        Self {
            shop_name: shop_name.into(),
            currency_symbol: currency_symbol.into(),
            labels,
            fees,
        }
    }

    pub fn compose(&self, routed: &Routed) -> String {
        match &routed.intent {
            Intent::AskSalutation => format!(
                "আপনাকে কীভাবে সম্বোধন করবো? ‘{}’ না ‘{}’? যেটা লিখে দিন 🙂",
                self.labels.masculine, self.labels.feminine
            ),
            Intent::ConfirmSalutation { chosen } => format!(
                "ধন্যবাদ! সামনে থেকে আপনাকে **{}** বলে সম্বোধন করব। কীভাবে সাহায্য করতে পারি?",
                self.labels.label(*chosen)
            ),
            intent => {
                let prefix =
                    routed.salutation.map(|salutation| format!("{} ", self.labels.label(salutation)));
                format!("{}{}", prefix.unwrap_or_default(), self.body(intent))
            }
        }
    }

    fn body(&self, intent: &Intent) -> String {
        let cur = &self.currency_symbol;
        match intent {
            Intent::ShowroomInfo => format!(
                "আমাদের ফিজিক্যাল শোরুম নেই, **{} অনলাইন-ভিত্তিক**। ঢাকায় ডেলিভারি {}{cur}, ঢাকার বাইরে {}{cur}। পিকআপ লোকেশন দরকার হলে জানান, ম্যানেজ করার চেষ্টা করব।",
                self.shop_name, self.fees.inside, self.fees.outside
            ),
            Intent::OrderInstructions => "অর্ডার করতে এই ফরম্যাটে পাঠান:\n\
                 নাম: ...\nমোবাইল: ...\nঠিকানা: ...\nকোড: ...\nসাইজ: ...\nQty: 1\n\
                 উদা: নাম: রফিক, মোবাইল: 017..., ঠিকানা: মিরপুর, কোড: DR-1050, সাইজ: L, Qty: 1"
                .to_string(),
            Intent::OrderSubmitted { draft, breakdown, .. } => format!(
                "আপনার অর্ডার ডিটেইলস:\n{}\n\n✔️ কনফার্ম করব, ধন্যবাদ!",
                self.order_summary(draft, breakdown.as_ref())
            ),
            Intent::ProductInfo { product } => self.product_card(product),
            Intent::ProductNotFound { code } => {
                format!("দুঃখিত, {code} কোডের কোনো প্রোডাক্ট পাইনি। কোডটি আবার চেক করে পাঠাবেন?")
            }
            Intent::TrackingRequest => "অর্ডারের স্ট্যাটাস জানতে অর্ডারের সময় দেওয়া মোবাইল নম্বরটি পাঠান, আমরা চেক করে জানাচ্ছি।"
                .to_string(),
            Intent::FaqAnswer { answer } => answer.clone(),
            Intent::SmallTalk { category: SmallTalkCategory::Greeting } => {
                format!("হ্যালো 👋 {} থেকে বলছি! কীভাবে সাহায্য করতে পারি?", self.shop_name)
            }
            Intent::SmallTalk { category: SmallTalkCategory::Deescalation } => {
                "আপনার কষ্টটা বুঝি। শান্তভাবে বললে দ্রুত ও ভালোভাবে সাহায্য করতে পারব। 🙏".to_string()
            }
            Intent::SmallTalk { category: SmallTalkCategory::Thanks } => {
                "ধন্যবাদ! আরও কিছু লাগলে জানাবেন। 😊".to_string()
            }
            Intent::Fallback => format!(
                "হ্যালো 👋 {} থেকে বলছি! প্রোডাক্ট কোড দিলে দাম/স্টক বলব।\n\
                 অর্ডার করতে: নাম/মোবাইল/ঠিকানা/কোড/সাইজ/Qty লিখে দিন।\n\
                 সাধারণ প্রশ্ন করতে পারেন: ডেলিভারি, চার্জ, সাইজ, রিটার্ন ইত্যাদি।",
                self.shop_name
            ),
            // Handled in `compose`; never prefixed.
            Intent::AskSalutation | Intent::ConfirmSalutation { .. } => String::new(),
        }
    }

    fn order_summary(&self, draft: &OrderDraft, breakdown: Option<&PriceBreakdown>) -> String {
        let cur = &self.currency_symbol;
        let mut lines = vec![
            format!("নাম: {}", draft.customer_name),
            format!("মোবাইল: {}", draft.phone),
            format!("ঠিকানা: {}", draft.address),
            format!("কোড: {} | সাইজ: {} | Qty: {}", draft.product_code, draft.size, draft.quantity),
        ];
        if let Some(breakdown) = breakdown {
            lines.push(format!("পণ্যের দাম: {}{cur}", breakdown.subtotal));
            lines.push(format!("ডেলিভারি: {}{cur}", breakdown.delivery_fee));
            lines.push(format!("মোট বিল: {}{cur} (COD)", breakdown.total));
        }
        lines.join("\n")
    }

    fn product_card(&self, product: &Product) -> String {
        let cur = &self.currency_symbol;
        let mut lines =
            vec![format!("**{}** ({})", product.name, product.code), format!("দাম: {}{cur}", product.price)];
        if !product.sizes.is_empty() {
            let sizes: Vec<&str> = product.sizes.iter().map(String::as_str).collect();
            lines.push(format!("সাইজ: {}", sizes.join(", ")));
        }
        if !product.color.trim().is_empty() {
            lines.push(format!("কালার: {}", product.color));
        }
        if !product.stock_label.trim().is_empty() {
            lines.push(format!("স্টক: {}", product.stock_label));
        }
        if let Some(url) = &product.image_url {
            lines.push(format!("ছবি: {url}"));
        }
        if let Some(url) = &product.video_url {
            lines.push(format!("ভিডিও: {url}"));
        }
        lines.push("অর্ডার করতে 'অর্ডার' লিখুন।".to_string());
        lines.join("\n")
    }
}
