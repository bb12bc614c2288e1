//! UI strings in Arabic and English.
//!
//! Templates look strings up by key through [`Page::t`](crate::middleware::Page::t).
//! A missing key renders as the key itself so a typo is visible on the page
//! instead of failing the render.

use std::collections::HashMap;
use std::sync::LazyLock;

use naqlah_core::Locale;

/// `(key, arabic, english)`
const MESSAGES: &[(&str, &str, &str)] = &[
    // App
    ("app.name", "نقلة", "Naqlah"),
    ("app.tagline", "نقل أثاث بسهولة وأمان", "Furniture moving made easy"),
    // Navigation
    ("nav.home", "الرئيسية", "Home"),
    ("nav.dashboard", "لوحة التحكم", "Dashboard"),
    ("nav.login", "تسجيل الدخول", "Log in"),
    ("nav.logout", "تسجيل الخروج", "Log out"),
    ("nav.partners", "الشركاء", "Partners"),
    ("nav.services", "الخدمات", "Services"),
    ("nav.about", "من نحن", "About"),
    ("nav.contact", "تواصل معنا", "Contact"),
    ("nav.request_move", "اطلب نقل", "Request a move"),
    ("nav.order_move", "طلب جديد", "New order"),
    ("nav.settings", "الإعدادات", "Settings"),
    ("nav.language", "اللغة", "Language"),
    ("nav.register_company", "سجّل شركتك", "Register your company"),
    ("sidebar.toggle", "إظهار/إخفاء القائمة", "Toggle menu"),
    // Footer
    ("footer.site_links", "روابط الموقع", "Site links"),
    ("footer.other_links", "روابط أخرى", "Other links"),
    ("footer.faq", "الأسئلة الشائعة", "FAQ"),
    ("footer.privacy", "سياسة الخصوصية", "Privacy policy"),
    ("footer.terms", "الشروط والأحكام", "Terms and conditions"),
    ("footer.copyright", "جميع الحقوق محفوظة", "All rights reserved"),
    // Newsletter
    ("newsletter.title", "اشترك في النشرة البريدية", "Subscribe to our newsletter"),
    (
        "newsletter.subtitle",
        "عروض حصرية ورسائل أسبوعية",
        "Exclusive offers and weekly emails",
    ),
    ("newsletter.email_placeholder", "بريدك الإلكتروني", "Your email"),
    ("newsletter.subscribe", "اشترك الآن", "Subscribe now"),
    ("newsletter.success", "تم الاشتراك بنجاح", "You are subscribed"),
    // Install prompt
    ("pwa.install_title", "ثبّت تطبيق نقلة", "Install the Naqlah app"),
    (
        "pwa.install_body",
        "أضف نقلة إلى شاشتك الرئيسية للوصول السريع",
        "Add Naqlah to your home screen for quick access",
    ),
    ("pwa.install", "تثبيت", "Install"),
    ("pwa.dismiss", "ليس الآن", "Not now"),
    // Home: hero
    ("hero.title", "انقل أثاثك", "Move your furniture"),
    ("hero.title_line2", "بكل سهولة وأمان", "easily and safely"),
    (
        "hero.subtitle",
        "اطلب نقل أثاثك واستقبل عروض أفضل شركات النقل المعتمدة",
        "Request a move and get offers from the best certified movers",
    ),
    ("hero.cta_order", "اطلب نقل الآن", "Order a move now"),
    ("hero.cta_partner", "انضم كشريك", "Join as a partner"),
    ("hero.certified", "شركات معتمدة", "Certified companies"),
    // Home: services
    ("services.title", "خدماتنا المميزة", "Featured services"),
    (
        "services.subtitle",
        "كل ما تحتاجه لنقل أثاثك في مكان واحد",
        "Everything you need for your move in one place",
    ),
    // Home: about
    ("about.title", "من نحن", "About us"),
    ("about.mission_title", "رسالتنا", "Our mission"),
    (
        "about.mission_text",
        "تسهيل نقل الأثاث بربط العملاء بشركات نقل موثوقة",
        "Make moving simple by connecting customers with trusted movers",
    ),
    ("about.vision_title", "رؤيتنا", "Our vision"),
    (
        "about.vision_text",
        "أن نكون المنصة الأولى لنقل الأثاث في المملكة",
        "To be the leading furniture moving platform in the Kingdom",
    ),
    ("about.values_title", "قيمنا", "Our values"),
    ("about.quality", "الجودة", "Quality"),
    ("about.speed", "السرعة", "Speed"),
    ("about.trust", "الثقة", "Trust"),
    ("about.satisfaction", "رضا العملاء", "Customer satisfaction"),
    // Home: partners
    ("partners.title", "شركاؤنا", "Our partners"),
    (
        "partners.subtitle",
        "شركات نقل معتمدة تعمل معنا",
        "Certified moving companies working with us",
    ),
    // Home: contact
    ("contact.title", "تواصل معنا", "Contact us"),
    ("contact.name", "الاسم", "Name"),
    ("contact.email", "البريد الإلكتروني", "Email"),
    ("contact.phone", "رقم الجوال", "Phone number"),
    ("contact.subject", "عنوان الرسالة", "Subject"),
    ("contact.message", "الرسالة", "Message"),
    ("contact.send", "إرسال الرسالة", "Send message"),
    (
        "contact.success",
        "تم استلام رسالتك وسنتواصل معك قريباً",
        "We received your message and will be in touch soon",
    ),
    // Offline
    ("offline.title", "لا يوجد اتصال بالإنترنت", "You are offline"),
    (
        "offline.body",
        "تحقق من اتصالك ثم حاول مرة أخرى",
        "Check your connection and try again",
    ),
    ("offline.retry", "إعادة المحاولة", "Try again"),
    // Login
    ("login.title", "تسجيل الدخول", "Log in"),
    (
        "login.subtitle",
        "أدخل رقم جوالك لإرسال رمز التحقق",
        "Enter your phone number to receive a verification code",
    ),
    ("login.customer_tab", "عميل", "Customer"),
    ("login.company_tab", "شركة", "Company"),
    ("login.phone_label", "رقم الجوال", "Phone number"),
    ("login.phone_placeholder", "5xxxxxxxx", "5xxxxxxxx"),
    ("login.save_data", "حفظ بياناتي", "Remember me"),
    ("login.submit", "إرسال الرمز", "Send code"),
    ("login.no_account", "ليس لديك حساب شركة؟", "No company account?"),
    ("login.register_now", "سجّل الآن", "Register now"),
    // OTP
    ("otp.title", "رمز التحقق", "Verification code"),
    ("otp.subtitle", "أدخل الرمز المرسل إلى", "Enter the code sent to"),
    ("otp.label", "الرمز المكون من 6 أرقام", "6-digit code"),
    ("otp.verify", "تحقق", "Verify"),
    ("otp.did_not_receive", "لم يصلك الرمز؟", "Didn't get the code?"),
    ("otp.resend", "إعادة الإرسال", "Resend"),
    ("otp.resent", "تم إرسال رمز جديد", "A new code was sent"),
    ("otp.change_number", "تغيير الرقم", "Change number"),
    ("otp.seconds_left", "ثانية متبقية", "seconds left"),
    // Profile
    ("profile.title", "أكمل ملفك الشخصي", "Complete your profile"),
    ("profile.first_name", "الاسم الأول", "First name"),
    ("profile.last_name", "اسم العائلة", "Last name"),
    ("profile.phone", "رقم الجوال", "Phone number"),
    ("profile.email", "البريد الإلكتروني (اختياري)", "Email (optional)"),
    ("profile.agree_terms", "أوافق على الشروط والأحكام", "I agree to the terms and conditions"),
    ("profile.save", "حفظ ومتابعة", "Save and continue"),
    // Dashboard
    ("dashboard.title", "لوحة التحكم", "Dashboard"),
    ("dashboard.welcome", "مرحباً", "Welcome"),
    ("dashboard.new_order", "طلب نقل جديد", "New move order"),
    ("dashboard.empty", "لا توجد طلبات بعد", "No orders yet"),
    ("dashboard.submitted", "تم إرسال طلبك بنجاح", "Your order was submitted"),
    // Settings
    ("settings.title", "الإعدادات", "Settings"),
    ("settings.language", "لغة الواجهة", "Interface language"),
    ("settings.sidebar", "القائمة الجانبية", "Sidebar"),
    ("settings.sidebar_open", "مفتوحة", "Open"),
    ("settings.sidebar_closed", "مغلقة", "Closed"),
    ("settings.cache", "الملفات المحفوظة", "Offline files"),
    ("settings.clear_cache", "مسح الملفات المحفوظة", "Clear offline files"),
    // Company registration
    ("company.title", "تسجيل شركة نقل", "Register a moving company"),
    (
        "company.subtitle",
        "انضم إلى شركائنا واستقبل طلبات النقل",
        "Join our partners and receive move requests",
    ),
    ("company.logo", "شعار الشركة", "Company logo"),
    ("company.name", "اسم الشركة", "Company name"),
    ("company.covenant", "العهدة", "Covenant"),
    ("company.commercial_registration", "السجل التجاري", "Commercial registration"),
    ("company.city", "المدينة", "City"),
    ("company.email", "البريد الإلكتروني", "Email"),
    ("company.password", "كلمة المرور", "Password"),
    ("company.confirm_password", "تأكيد كلمة المرور", "Confirm password"),
    ("company.secret_code", "الرمز السري", "Secret code"),
    ("company.services", "الخدمات المقدمة", "Services offered"),
    ("company.about", "نبذة عن الشركة", "About the company"),
    (
        "company.about_placeholder",
        "اكتب نبذة مختصرة عن شركتك",
        "Write a short description of your company",
    ),
    ("company.agree_terms", "أوافق على الشروط والأحكام", "I agree to the terms and conditions"),
    ("company.submit", "تسجيل", "Register"),
    ("company.registered_title", "تم استلام طلب التسجيل", "Registration received"),
    (
        "company.registered_body",
        "سنراجع بيانات شركتك ونتواصل معك قريباً",
        "We will review your company details and contact you soon",
    ),
    // Wizard: shared
    ("wizard.step", "الخطوة", "Step"),
    ("wizard.of", "من", "of"),
    ("wizard.continue", "متابعة", "Continue"),
    ("wizard.back", "رجوع", "Back"),
    ("wizard.restart", "البدء من جديد", "Start over"),
    ("wizard.select", "اختر", "Select"),
    ("wizard.fix_errors", "يرجى تعبئة الحقول المطلوبة", "Please fill in the required fields"),
    // Wizard: location
    ("wizard.search", "بحث", "Search"),
    ("wizard.search_placeholder", "ابحث عن موقع", "Search for a location"),
    ("wizard.use_my_location", "استخدم موقعي", "Use my location"),
    ("wizard.address", "العنوان", "Address"),
    ("wizard.city", "المدينة", "City"),
    ("wizard.latitude", "خط العرض", "Latitude"),
    ("wizard.longitude", "خط الطول", "Longitude"),
    ("wizard.show_map", "عرض الخريطة", "Show map"),
    ("wizard.no_results", "لم يتم العثور على نتائج", "No results found"),
    // Wizard: details
    ("wizard.full_address", "العنوان الكامل", "Full address"),
    ("wizard.building_name", "اسم المبنى", "Building name"),
    ("wizard.floor", "الطابق", "Floor"),
    ("wizard.ground_floor", "الأرضي", "Ground"),
    ("wizard.has_elevator", "هل يوجد مصعد؟", "Is there an elevator?"),
    ("wizard.elevator_size", "حجم المصعد", "Elevator size"),
    ("wizard.notes", "ملاحظات إضافية", "Additional notes"),
    // Wizard: furniture
    ("wizard.rooms_count", "عدد الغرف", "Number of rooms"),
    ("wizard.furniture_items", "قطع الأثاث", "Furniture items"),
    ("wizard.quantity", "الكمية", "Quantity"),
    ("wizard.upload_photos", "صور الأثاث", "Furniture photos"),
    ("wizard.upload_hint", "صور فقط، حتى 10 ميجابايت", "Images only, up to 10 MB"),
    // Wizard: services
    ("wizard.packaging", "التغليف", "Packaging"),
    ("wizard.cleaning_before", "التنظيف قبل النقل", "Cleaning before the move"),
    ("wizard.cleaning_after", "التنظيف بعد النقل", "Cleaning after the move"),
    ("wizard.insurance", "التأمين", "Insurance"),
    ("wizard.need_disassembly", "هل تحتاج فك وتركيب؟", "Need disassembly?"),
    ("wizard.disassembly_items", "القطع المطلوب فكها", "Items to disassemble"),
    ("wizard.disassembly_notes", "ملاحظات الفك", "Disassembly notes"),
    // Wizard: date and time
    ("wizard.date", "التاريخ", "Date"),
    ("wizard.time", "الوقت", "Time"),
    ("wizard.period", "الفترة", "Period"),
    // Review
    ("review.pickup", "موقع الاستلام", "Pickup"),
    ("review.destination", "موقع التوصيل", "Destination"),
    ("review.furniture", "تفاصيل الأثاث", "Furniture details"),
    ("review.services", "الخدمات الإضافية", "Additional services"),
    ("review.date_time", "التاريخ والوقت", "Date and time"),
    ("review.edit", "تعديل", "Edit"),
    ("review.submit", "إرسال الطلب", "Submit request"),
    ("review.route", "المسافة والوقت", "Distance and time"),
    ("review.route_estimate", "تقدير تقريبي", "Rough estimate"),
    ("review.minutes", "دقيقة", "min"),
    ("review.km", "كم", "km"),
    ("review.photos", "صور", "photos"),
    ("review.pieces", "قطعة", "pieces"),
    ("review.none", "لا يوجد", "None"),
    // Processing
    ("processing.title", "جاري معالجة طلبك", "Your request is being processed"),
    (
        "processing.body",
        "سنرسل طلبك إلى شركات النقل وننتظر عروضهم",
        "We are sending your request to movers and waiting for their offers",
    ),
    ("processing.status", "حالة الطلب", "Request status"),
    ("processing.waiting", "بانتظار الرد", "Waiting for response"),
    ("processing.dashboard", "الذهاب إلى لوحة التحكم", "Go to dashboard"),
    ("processing.home", "العودة للرئيسية", "Back to home"),
    // Errors
    ("error.not_found", "الصفحة غير موجودة", "Page not found"),
];

static CATALOG: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        MESSAGES
            .iter()
            .map(|&(key, ar, en)| (key, (ar, en)))
            .collect()
    });

/// Look up a UI string. Unknown keys come back unchanged.
#[must_use]
pub fn t<'a>(locale: Locale, key: &'a str) -> &'a str {
    match CATALOG.get(key) {
        Some(&(ar, en)) => match locale {
            Locale::Ar => ar,
            Locale::En => en,
        },
        None => {
            tracing::debug!(key, "missing translation");
            key
        }
    }
}
